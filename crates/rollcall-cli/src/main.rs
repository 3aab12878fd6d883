use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;
use rollcall_cli::seeder::{SeedConfig, clear_seeded_data, seed_all};
use rollcall_cli::{create_account, purge_sessions};
use rollcall_config::StoreConfig;
use rollcall_core::Role;
use rollcall_db::Store;
use rollcall_observability::init_basic_console_logging;

#[derive(Parser)]
#[command(name = "rollcall-cli")]
#[command(about = "Rollcall CLI - Administrative tools for Rollcall", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Student,
    Teacher,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Student => Role::Student,
            RoleArg::Teacher => Role::Teacher,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a student or teacher account
    CreateAccount {
        /// Role of the account (prompted if not provided)
        #[arg(short = 'r', long, value_enum)]
        role: Option<RoleArg>,

        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake teachers, students, subjects and enrollments
    Seed {
        /// Number of teachers to create
        #[arg(long, default_value = "5")]
        teachers: usize,

        /// Number of students to create
        #[arg(long, default_value = "30")]
        students: usize,

        /// Subjects taught by each teacher
        #[arg(long, default_value = "2")]
        subjects_per_teacher: usize,

        /// Subjects each student enrolls in
        #[arg(long, default_value = "3")]
        enrollments_per_student: usize,
    },
    /// Clear all seeded data (keeps real accounts)
    ClearSeed,
    /// Delete expired sessions
    PurgeSessions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_basic_console_logging();

    let cli = Cli::parse();
    let store = Store::connect(&StoreConfig::from_env())
        .await
        .context("Failed to open the account store")?;

    match cli.command {
        Commands::CreateAccount {
            role,
            name,
            email,
            password,
        } => handle_create_account(&store, role, name, email, password).await,
        Commands::Seed {
            teachers,
            students,
            subjects_per_teacher,
            enrollments_per_student,
        } => {
            let config = SeedConfig {
                teachers,
                students,
                subjects_per_teacher,
                enrollments_per_student,
            };
            seed_all(&store, &config)
                .await
                .context("Error seeding database")?;
            Ok(())
        }
        Commands::ClearSeed => {
            clear_seeded_data(&store)
                .await
                .context("Error clearing seeded data")?;
            Ok(())
        }
        Commands::PurgeSessions => {
            let purged = purge_sessions(&store)
                .await
                .context("Error purging sessions")?;
            println!("✅ Purged {purged} expired sessions");
            Ok(())
        }
    }
}

async fn handle_create_account(
    store: &Store,
    role: Option<RoleArg>,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    // Use provided values or prompt interactively
    let role: Role = match role {
        Some(role) => role.into(),
        None => {
            let labels: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
            let idx = Select::new()
                .with_prompt("Role")
                .items(&labels)
                .default(0)
                .interact()?;
            Role::ALL[idx]
        }
    };

    let name = match name {
        Some(name) => name,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let account = create_account(store, &email, &password, &name, role)
        .await
        .map_err(|e| anyhow::anyhow!("Error creating account: {e}"))?;

    println!("\n✅ {} account created successfully!", role);
    println!("   Email: {}", account.email);
    println!("   Name: {}", account.name);
    println!("   Sign in at {}", role.sign_in_path());
    Ok(())
}
