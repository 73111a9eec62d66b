use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use prayaas_agents::{AdvisorAgent, ProfileInput, ProfileOptions};
use prayaas_core::UserProfile;
use prayaas_observability::{init_tracing, AppMetrics};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "prayaas")]
#[command(about = "PRAYAAS insurance advisor CLI")]
struct Cli {
    #[command(flatten)]
    profile: ProfileArgs,

    #[command(subcommand)]
    command: Command,
}

/// Profile fields. Labels accept either the code (`5_to_7_5_lakh`) or the display text.
#[derive(Debug, Args)]
struct ProfileArgs {
    #[arg(long, global = true, env = "PRAYAAS_AGE", default_value_t = 30)]
    age: i64,
    #[arg(long, global = true, env = "PRAYAAS_INCOME", default_value = "5_to_7_5_lakh")]
    income: String,
    #[arg(
        long,
        global = true,
        env = "PRAYAAS_OCCUPATION",
        default_value = "private_sector_employee"
    )]
    occupation: String,
    #[arg(long, global = true, env = "PRAYAAS_FAMILY", default_value_t = 4)]
    family: i64,
    #[arg(long = "insurance", global = true, value_delimiter = ',')]
    existing_insurance: Vec<String>,
    #[arg(long = "condition", global = true, value_delimiter = ',')]
    health_conditions: Vec<String>,
    #[arg(long, global = true, env = "PRAYAAS_LANGUAGE", default_value = "en")]
    language: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Category distribution and featured policies for the profile.
    Recommend,
    /// Score card and verdict for a named policy.
    Analyze { policy_name: String },
    /// One-off question to the advisor.
    Ask { question: String },
    /// Interactive chat session.
    Chat,
    /// Every accepted profile label.
    Options,
}

impl ProfileArgs {
    fn to_profile(&self) -> Result<UserProfile> {
        let input = ProfileInput {
            age: self.age,
            income_range: self.income.clone(),
            occupation: self.occupation.clone(),
            family_members: self.family,
            existing_insurance: self.existing_insurance.clone(),
            health_conditions: self.health_conditions.clone(),
            language: self.language.clone(),
        };
        UserProfile::try_from(input).context("invalid profile flags")
    }
}

fn main() -> Result<()> {
    init_tracing("prayaas_cli");
    let cli = Cli::parse();

    let agent = AdvisorAgent::with_reference_catalog(AppMetrics::shared());

    match cli.command {
        Command::Recommend => {
            let profile = cli.profile.to_profile()?;
            print_json(&agent.recommend(&profile))?;
        }
        Command::Analyze { policy_name } => {
            let profile = cli.profile.to_profile()?;
            let analysis = agent
                .analyze_policy(&profile, &policy_name)
                .context("policy analysis failed")?;
            print_json(&analysis)?;
        }
        Command::Ask { question } => {
            let profile = cli.profile.to_profile()?;
            let (_, reply) = agent.answer(&profile, &question, &[]);
            println!("{reply}");
        }
        Command::Chat => {
            let profile = cli.profile.to_profile()?;
            run_chat(&agent, &profile)?;
        }
        Command::Options => print_json(&ProfileOptions::catalog())?,
    }

    Ok(())
}

fn run_chat(agent: &AdvisorAgent, profile: &UserProfile) -> Result<()> {
    let mut session = agent.start_conversation();

    if let Some(greeting) = session.turns().first() {
        println!("{}\n", greeting.text);
    }
    println!("Try asking:");
    for question in agent.suggested_questions() {
        println!("- {question}");
    }
    println!("\ntype 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }
        if message.is_empty() {
            continue;
        }

        let reply = agent.chat(&mut session, profile, message)?;
        println!("\n{}\n", reply.reply_text);
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
