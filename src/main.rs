use anyhow::Context;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use smara::{process_query, Config, CoordinatorAgent};

const RULE: &str = "============================================================";

/// Simplified multi-agent research assistant
#[derive(Parser, Debug)]
#[command(name = "smara", version, about)]
struct Cli {
    /// Query or YouTube URL; starts an interactive session when omitted
    query: Vec<String>,
}

fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn print_banner() {
    println!(
        "
╔══════════════════════════════════════════════════════════════╗
║   Multi-Agent Research Assistant                             ║
║     Agent-to-Agent Communication (MCP Protocol)              ║
║                                                              ║
╚══════════════════════════════════════════════════════════════╝
"
    );
}

async fn single_query_mode(coordinator: &mut CoordinatorAgent, query: &str) -> anyhow::Result<()> {
    println!("🔄 Processing: {}", query);
    println!("{}", RULE);

    let report = process_query(coordinator, query).await?;
    println!("{}", report);
    println!("{}", RULE);
    println!("✅ Complete!");
    Ok(())
}

async fn interactive_mode(coordinator: &mut CoordinatorAgent) -> anyhow::Result<()> {
    println!("🔄 SMARA is ready! Enter your queries below.");
    println!("   • Paste YouTube URL to analyze video");
    println!("   • Enter topic to search and summarize");
    println!("   • Type 'quit' to exit\n");

    let mut rl = DefaultEditor::new().context("Failed to initialize readline")?;

    loop {
        match rl.readline("📝 Query: ") {
            Ok(line) => {
                let input = line.trim();

                if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q") {
                    println!("\n👋 Goodbye!");
                    break;
                }

                if input.is_empty() {
                    println!("❌ Please enter a query or URL\n");
                    continue;
                }

                let _ = rl.add_history_entry(input);

                println!("\n🔄 Processing: {}", input);
                println!("{}", RULE);

                match process_query(coordinator, input).await {
                    Ok(report) => {
                        println!("{}", report);
                        println!("{}", RULE);
                        println!("✅ Complete!\n");
                    }
                    Err(e) => println!("\n❌ Error: {}\n", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("\n\n👋 Interrupted by user. Goodbye!");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("\n👋 Goodbye!");
                break;
            }
            Err(e) => return Err(anyhow::anyhow!("Readline error: {}", e)),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    setup_logging();
    let cli = Cli::parse();

    print_banner();

    let mut coordinator = match Config::from_env()
        .and_then(|config| CoordinatorAgent::new(&config).map_err(anyhow::Error::from))
    {
        Ok(coordinator) => coordinator,
        Err(e) => {
            println!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.query.is_empty() {
        if let Err(e) = interactive_mode(&mut coordinator).await {
            log::error!("Interactive session ended: {}", e);
            println!("❌ Error: {}", e);
            std::process::exit(1);
        }
    } else {
        let query = cli.query.join(" ");
        if let Err(e) = single_query_mode(&mut coordinator, &query).await {
            println!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}
