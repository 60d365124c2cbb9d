use anyhow::Context;
use clap::Parser;

use combicalc::interpreter::{FunctionRegistry, evaluate};
use combicalc::parser::Grammar;

/// Evaluate an arithmetic expression
#[derive(Parser, Debug)]
#[command(name = "combicalc", version)]
struct Args {
    /// Expression to evaluate; multiple words are joined with spaces
    #[arg(required_unless_present = "list_functions")]
    expression: Vec<String>,

    /// Print the parsed tree before the result
    #[arg(long)]
    tree: bool,

    /// Print the names of all callable functions and exit
    #[arg(long)]
    list_functions: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let functions = FunctionRegistry::with_builtins();

    if args.list_functions {
        for name in functions.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let input = args.expression.join(" ");
    let grammar = Grammar::new(&functions);
    let parsed = grammar
        .parse(&input)
        .with_context(|| format!("failed to parse {input:?}"))?;

    if args.tree {
        println!("{}", parsed.value);
    }
    println!("{}", evaluate(&parsed.value, &functions));

    Ok(())
}
