use std::{env, process};

use member_form::{
    cli::{self, output},
    init,
};

fn main() {
    init();

    if let Err(err) = cli::run(env::args().skip(1)) {
        output::error(&err);
        if matches!(err, cli::CliError::Usage(_)) {
            eprintln!("{}", cli::USAGE);
        }
        process::exit(1);
    }
}
