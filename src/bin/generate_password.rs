//! Offline helper: prints an Argon2 hash to use as `ADMIN_PASSWORD_HASH`.

use std::process::ExitCode;

use clap::Parser;
use scopo_blog::password;

#[derive(Parser)]
#[command(
    name = "generate-password",
    about = "Hash an admin password for the ADMIN_PASSWORD_HASH setting"
)]
struct Args {
    /// Plaintext admin password.
    password: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match password::hash_secret(&args.password) {
        Ok(hash) => {
            println!("Password hash: {hash}");
            // The hash contains `$`, which dotenv would otherwise try to expand.
            println!("Add it to .env in single quotes: ADMIN_PASSWORD_HASH='{hash}'");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error generating hash: {e}");
            ExitCode::FAILURE
        }
    }
}
