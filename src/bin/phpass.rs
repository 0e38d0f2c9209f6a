use phpass::PasswordHasher;

use std::io;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
#[command(infer_subcommands = true)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Generate(GenerateArgs),
    Validate(ValidateArgs),
}

#[derive(Clone, Debug, Args)]
struct GenerateArgs {
    #[arg(long, short)]
    password: Option<String>,
    /// Base-2 logarithm of the iteration count; values outside 4..=31 mean 8
    #[arg(long, short, default_value_t = 8, allow_negative_numbers = true)]
    rounds: i32,
}

#[derive(Clone, Debug, Args)]
struct ValidateArgs {
    #[arg(long, short)]
    password: Option<String>,
    hash: String
}

fn generate(GenerateArgs{ password, rounds }: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pw = prompt_password(password)?;
    let hash = PasswordHasher::new(rounds, true).hash_password(pw)?;
    println!("{}", hash);
    Ok(())
}

fn validate(ValidateArgs{ password, hash }: ValidateArgs) -> io::Result<()> {
    let pw = match password {
	Some(pw) => pw,
	None => rpassword::prompt_password("Password: ")?,
    };
    if PasswordHasher::default().check_password(pw, &hash) {
	println!("valid");
    } else {
	println!("not valid");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
	.with_env_filter(EnvFilter::from_default_env())
	.with_writer(io::stderr)
	.init();
    let cli = Cli::parse();
    let cmd = cli.command.unwrap_or(Commands::Generate(cli.generate));
    match cmd {
	Commands::Generate(args) => generate(args)?,
	Commands::Validate(args) => validate(args)?,
    };
    Ok(())
}

fn prompt_password(password: Option<String>) -> io::Result<String> {
    match password {
	Some(pw) => Ok(pw),
	None => loop {
	    let pw = rpassword::prompt_password("Enter new password: ")?;
	    let confirmed = rpassword::prompt_password("Retype new password: ")?;
	    if pw == confirmed {
		return Ok(pw)
	    }
	    println!("Error: Passwords don't match!")
	}
    }
}
