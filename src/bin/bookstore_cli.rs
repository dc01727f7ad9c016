use std::{env, process};

use bookstore_core::{cli::run_cli, init, utils::build_info};

fn main() {
    init();

    if env::args().skip(1).any(|arg| arg == "--version" || arg == "-V") {
        println!("{}", build_info::current().summary());
        return;
    }

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
