//! Console and `.env` rendering of derived keys.
//!
//! The exact layout is a compatibility contract: downstream configuration
//! keys off the positional/textual order, and the env keys are the labels
//! uppercased with `//` collapsed to `_`.

use std::{fmt::Write as _, fs, io, path::Path};

use keyforge_core::{Account, DerivationPath, SessionKeySet, SessionRole};

/// Prints account blocks to stdout, in derivation order.
pub fn print_accounts(accounts: &[Account]) {
    for account in accounts {
        println!("# {}", account.name);
        println!("Private: {}", account.seed.to_hex());
        println!("Public: {}", account.address);
        println!();
    }
}

/// Prints session-key blocks to stdout, roles in fixed order.
pub fn print_session_keys(sets: &[SessionKeySet]) {
    for set in sets {
        println!("# {} Session Keys:", set.name);
        println!();
        for (role, pair) in set.in_role_order() {
            println!("# {}", role_heading(role));
            println!("Private: {}", pair.secret);
            println!("Public: {}", pair.public);
            println!();
        }
    }
}

const fn role_heading(role: SessionRole) -> &'static str {
    match role {
        SessionRole::Babe => "BABE",
        SessionRole::Gran => "GRAN (GRANDPA)",
        SessionRole::Imon => "IMON (I'm Online)",
    }
}

/// Writes the flat key-value form of all derived keys.
///
/// # Errors
///
/// Returns the underlying i/o error if the file cannot be written.
pub fn write_dotenv(
    accounts: &[Account],
    sets: &[SessionKeySet],
    path: &Path,
) -> io::Result<()> {
    fs::write(path, render_dotenv(accounts, sets))
}

fn render_dotenv(accounts: &[Account], sets: &[SessionKeySet]) -> String {
    let mut out = String::new();
    out.push_str(
        "# if you can see this file in a source control system,\n\
         # the data here should be considered the leaked secrets\n\
         # and the keys should be updated\n\n\n",
    );

    for account in accounts {
        let key = env_key(&account.name);
        let _ = writeln!(out, "# {}", account.name);
        let _ = writeln!(out, "{key}_PRIVATE=\"{}\"", account.seed.to_hex());
        let _ = writeln!(out, "{key}_PUBLIC=\"{}\"", account.address);
        out.push('\n');
    }

    out.push_str("\n# SESSION KEYS\n\n");
    for set in sets {
        let key = env_key(&set.name);
        let _ = writeln!(out, "# {}", set.name);
        for (role, pair) in set.in_role_order() {
            let role = role.to_string().to_uppercase();
            let _ = writeln!(out, "{key}_{role}_PRIVATE=\"{}\"", pair.secret);
            let _ = writeln!(out, "{key}_{role}_PUBLIC=\"{}\"", pair.public);
        }
        out.push('\n');
    }

    out
}

/// `diego//stash` → `DIEGO_STASH`.
fn env_key(name: &DerivationPath) -> String {
    name.to_string().to_uppercase().replace("//", "_")
}
