use clap::Parser;
use credvault::cli::{commands, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    credvault::logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Add {
            ref service,
            ref username,
            generate,
            length,
        } => commands::add::execute(&cli, service, username.as_deref(), generate, length),
        Commands::Get { ref service } => commands::get::execute(&cli, service),
        Commands::List => commands::list::execute(&cli),
        Commands::Delete { ref service, force } => commands::delete::execute(&cli, service, force),
        Commands::Generate { length } => commands::generate::execute(length),
        Commands::Shell => commands::shell::execute(&cli),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        credvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
