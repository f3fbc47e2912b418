//! Renders keyclack(1) and one page per subcommand with clap_mangen.
//! Runs for release builds, or any build with KEYCLACK_GEN_MANPAGES set.

use clap::CommandFactory;
use clap_mangen::Man;
use std::env;
use std::fs::{self, File};
use std::io::Error;
use std::path::PathBuf;

include!("src/cli.rs");

fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-env-changed=KEYCLACK_GEN_MANPAGES");

    let release = env::var("PROFILE").is_ok_and(|p| p == "release");
    if !release && env::var_os("KEYCLACK_GEN_MANPAGES").is_none() {
        return Ok(());
    }

    let man_dir = PathBuf::from(env::var("OUT_DIR").unwrap_or_else(|_| "target".into())).join("man");
    fs::create_dir_all(&man_dir)?;

    let root = Cli::command();
    let pages = std::iter::once(("keyclack".to_string(), root.clone())).chain(
        root.get_subcommands()
            .filter(|sub| sub.get_name() != "help")
            .map(|sub| (format!("keyclack-{}", sub.get_name()), sub.clone())),
    );

    for (page, cmd) in pages {
        Man::new(cmd).render(&mut File::create(man_dir.join(format!("{}.1", page)))?)?;
    }

    Ok(())
}
