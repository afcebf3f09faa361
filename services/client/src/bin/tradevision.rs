//! services/client/src/bin/tradevision.rs

use clap::{Parser, Subcommand};
use client_lib::{
    app::App,
    config::Config,
    error::ClientError,
    pages::{PricingPage, SelectedFile},
    session::GuardDecision,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tradevision_core::domain::Difficulty;
use tradevision_core::filter::ALL;
use tradevision_core::route::Route;

#[derive(Parser)]
#[command(name = "tradevision", version, about = "Command-line client for the TradeVision service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        nickname: String,
        /// Defaults to the password.
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long, default_value = "BEGINNER")]
        level: Difficulty,
    },
    /// Forget the persisted session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Upload a chart image and print its analysis.
    Analyze { path: PathBuf },
    /// List previous analyses.
    History,
    /// Browse the technique catalog.
    Techniques {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// List learning modules.
    Modules {
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// List subscription plans.
    Plans,
    /// Show the current subscription and usage.
    Subscription,
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Restoring session...");

    // --- 2. Build the Application ---
    let app = App::from_config(config)?;

    // --- 3. Run the Command ---
    match cli.command {
        Command::Login { email, password } => {
            let mut page = app.login_page(&Route::login());
            page.form.email = email;
            page.form.password = password;
            page.submit().await?;
            if let Some(user) = app.session.user() {
                println!("Logged in as {} <{}>", user.nickname, user.email);
            }
        }
        Command::Signup {
            email,
            password,
            nickname,
            confirm_password,
            level,
        } => {
            let mut page = app.signup_page();
            page.confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            page.form.email = email;
            page.form.password = password;
            page.form.nickname = nickname;
            page.form.investment_level = Some(level);
            page.submit().await?;
            println!("Account created.");
        }
        Command::Logout => {
            app.session.logout();
            println!("Logged out.");
        }
        Command::Whoami => {
            require(&app, Route::Profile).await?;
            let user = app.session.refresh_user().await?;
            println!("{} <{}> (id {})", user.nickname, user.email, user.id);
        }
        Command::Analyze { path } => {
            require(&app, Route::Analysis).await?;
            let mut page = app.analysis_page();
            page.select_file(SelectedFile::from_path(&path).await?)?;
            let analysis = page.upload_and_analyze().await?;
            println!("Analysis #{} ({:?})", analysis.id, analysis.status);
            println!("{}", analysis.analysis.as_deref().unwrap_or("(no analysis text)"));
        }
        Command::History => {
            require(&app, Route::Analysis).await?;
            let mut page = app.analysis_page();
            page.load_history().await?;
            for entry in page.history().loaded().into_iter().flatten() {
                let when = entry
                    .created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("#{:<6} {:<16} {}", entry.id, when, entry.image_path);
            }
        }
        Command::Techniques {
            category,
            difficulty,
            keyword,
        } => {
            require(&app, Route::Techniques).await?;
            let mut page = app.techniques_page();
            page.load().await?;
            page.set_category(category.as_deref().unwrap_or(ALL));
            page.set_difficulty(difficulty.as_deref().unwrap_or(ALL))
                .map_err(|e| ClientError::Internal(e.to_string()))?;
            page.set_keyword(keyword.as_deref().unwrap_or_default());
            for technique in page.visible() {
                println!(
                    "#{:<4} [{} / {}] {}{}",
                    technique.id,
                    technique.category,
                    technique.difficulty,
                    technique.title,
                    if technique.is_bookmarked { " *" } else { "" }
                );
            }
        }
        Command::Modules { difficulty } => {
            require(&app, Route::Learning).await?;
            let mut page = app.learning_page();
            page.set_difficulty(difficulty.as_deref().unwrap_or(ALL)).await?;
            for module in page.modules().loaded().into_iter().flatten() {
                println!(
                    "#{:<4} [{}] {} ({} contents)",
                    module.id, module.difficulty, module.title, module.total_contents
                );
            }
        }
        Command::Plans => {
            let mut page = app.pricing_page();
            page.load().await?;
            for plan in page.plans().loaded().into_iter().flatten() {
                println!(
                    "#{:<3} {:<10} {:>10.0} / {}{}",
                    plan.id,
                    plan.name,
                    plan.price,
                    plan.billing_period,
                    if PricingPage::is_recommended(plan) { "  (recommended)" } else { "" }
                );
            }
        }
        Command::Subscription => {
            require(&app, Route::Profile).await?;
            let mut page = app.profile_page();
            page.load().await?;
            if let Some(data) = page.data().loaded() {
                match &data.subscription {
                    Some(sub) => println!("Plan: {} ({})", sub.plan.name, sub.status),
                    None => println!("Plan: none"),
                }
                if data.usage.is_unlimited {
                    println!("Chart analyses: {} used (unlimited)", data.usage.current_usage);
                } else {
                    println!(
                        "Chart analyses: {} of {} used, {} remaining",
                        data.usage.current_usage, data.usage.max_usage, data.usage.remaining_usage
                    );
                }
            }
        }
    }

    Ok(())
}

/// Fails unless the guard lets the session into `route`.
async fn require(app: &App, route: Route) -> Result<(), ClientError> {
    match app.enter(route).await {
        GuardDecision::Render(_) => Ok(()),
        GuardDecision::Redirect(_) | GuardDecision::Pending => Err(ClientError::NotAuthenticated),
    }
}
