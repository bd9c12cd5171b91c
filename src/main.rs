use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quiz_admin::api::{ApiClient, QuizApi, SettingsApi};
use quiz_admin::config::Config;
use quiz_admin::models::quiz::Quiz;
use quiz_admin::models::settings::{SelectedFile, LOCAL_FONTS};
use quiz_admin::notify::{ConsoleNotifier, Notifier};
use quiz_admin::views::quiz_form::QUESTION_SLOTS;
use quiz_admin::views::quiz_list::QuizListController;
use quiz_admin::views::settings::SettingsAggregator;

#[derive(Parser)]
#[command(name = "quiz-admin", about = "Operator console for the quiz application")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create and manage quizzes
    #[command(subcommand)]
    Quiz(QuizCommand),
    /// Application appearance settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum QuizCommand {
    /// List all quizzes
    List,
    /// Create a new quiz
    Add(AddArgs),
    /// Edit an existing quiz
    Edit(EditArgs),
    /// Delete a quiz (asks for confirmation)
    Remove {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Flip a quiz between active and inactive
    Toggle { id: String },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Make the quiz immediately playable
    #[arg(long)]
    active: bool,
    /// Hint text, repeated — all five slots must be filled
    #[arg(long = "question")]
    questions: Vec<String>,
    /// The single correct answer all hints point to
    #[arg(long)]
    answer: String,
}

#[derive(Args)]
struct EditArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// true or false
    #[arg(long)]
    active: Option<bool>,
    /// Replacement hint text, repeated; fills slots from the first
    #[arg(long = "question")]
    questions: Vec<String>,
    #[arg(long)]
    answer: Option<String>,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show current appearance settings and image URLs
    Show,
    /// List the recognized font families
    Fonts,
    /// Save background color, text color and font family
    Appearance {
        /// Hex color, e.g. #ffffff
        #[arg(long)]
        background_color: Option<String>,
        /// Hex color, e.g. #000000
        #[arg(long)]
        text_color: Option<String>,
        #[arg(long)]
        font_family: Option<String>,
    },
    /// Save logo dimensions (width 50-500 px, height 20-300 px)
    LogoSize {
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },
    /// Upload a replacement logo image (max 5MB)
    UploadLogo { path: PathBuf },
    /// Upload a replacement background image (max 5MB)
    UploadBackground { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = ApiClient::new(&config);
    let notifier = ConsoleNotifier::new();

    match cli.command {
        Command::Quiz(command) => run_quiz(command, client, &notifier).await?,
        Command::Settings(command) => {
            run_settings(command, client, &notifier, &config.upload_base_url).await?
        }
    }

    if notifier.saw_error() {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_quiz(
    command: QuizCommand,
    client: ApiClient,
    notifier: &ConsoleNotifier,
) -> anyhow::Result<()> {
    let mut controller = QuizListController::new(client, notifier);

    match command {
        QuizCommand::List => {
            controller.refresh().await;
            print_quizzes(controller.quizzes());
        }
        QuizCommand::Add(args) => {
            controller.open_create();
            controller.form.title = args.title;
            controller.form.description = args.description;
            controller.form.is_active = args.active;
            controller.form.answer = args.answer;
            for (index, question) in args.questions.iter().take(QUESTION_SLOTS).enumerate() {
                controller.form.set_question(index, question.clone());
            }
            controller.submit().await;
            bail_on_alert(&controller)?;
        }
        QuizCommand::Edit(args) => {
            controller.refresh().await;
            if !controller.start_edit(&args.id) {
                anyhow::bail!("Quiz {} not found", args.id);
            }
            if let Some(title) = args.title {
                controller.form.title = title;
            }
            if let Some(description) = args.description {
                controller.form.description = description;
            }
            if let Some(active) = args.active {
                controller.form.is_active = active;
            }
            if let Some(answer) = args.answer {
                controller.form.answer = answer;
            }
            for (index, question) in args.questions.iter().take(QUESTION_SLOTS).enumerate() {
                controller.form.set_question(index, question.clone());
            }
            controller.submit().await;
            bail_on_alert(&controller)?;
        }
        QuizCommand::Remove { id, yes } => {
            controller.refresh().await;
            if !controller.request_delete(&id) {
                anyhow::bail!("Quiz {id} not found");
            }
            let title = controller
                .pending_delete()
                .map(|quiz| quiz.title.clone())
                .unwrap_or_default();
            if !yes && !confirm(&format!(
                "Are you sure you want to delete the quiz \"{title}\"? This action cannot be undone."
            ))? {
                controller.cancel_delete();
                println!("Cancelled.");
                return Ok(());
            }
            controller.confirm_delete().await;
        }
        QuizCommand::Toggle { id } => {
            controller.refresh().await;
            controller.toggle_active(&id).await;
        }
    }

    Ok(())
}

async fn run_settings(
    command: SettingsCommand,
    client: ApiClient,
    notifier: &ConsoleNotifier,
    upload_base_url: &str,
) -> anyhow::Result<()> {
    let mut aggregator = SettingsAggregator::new(client, notifier, upload_base_url);

    match command {
        SettingsCommand::Show => {
            aggregator.load_all().await;
            println!("Background color:  {}", aggregator.settings.background_color);
            println!("Text color:        {}", aggregator.settings.text_color);
            println!("Font family:       {}", aggregator.settings.font_family);
            println!(
                "Logo size:         {} x {} px",
                aggregator.logo_width, aggregator.logo_height
            );
            println!(
                "Logo:              {}",
                aggregator.current_logo().unwrap_or("no logo uploaded yet")
            );
            println!(
                "Background image:  {}",
                aggregator
                    .current_background()
                    .unwrap_or("no background image uploaded yet")
            );
        }
        SettingsCommand::Fonts => {
            for font in LOCAL_FONTS {
                println!("{:<28} {}", font.value, font.label);
            }
        }
        SettingsCommand::Appearance {
            background_color,
            text_color,
            font_family,
        } => {
            // fetch current values so single-field updates keep the rest
            aggregator.load_all().await;
            if let Some(color) = background_color {
                aggregator.settings.background_color = color;
            }
            if let Some(color) = text_color {
                aggregator.settings.text_color = color;
            }
            if let Some(font) = font_family {
                aggregator.settings.font_family = font;
            }
            aggregator.save_appearance().await;
            bail_on_settings_alert(&aggregator)?;
        }
        SettingsCommand::LogoSize { width, height } => {
            aggregator.save_logo_size(width, height).await;
        }
        SettingsCommand::UploadLogo { path } => {
            let file = selected_file(&path).await?;
            aggregator.upload_logo(file).await;
            bail_on_settings_alert(&aggregator)?;
        }
        SettingsCommand::UploadBackground { path } => {
            let file = selected_file(&path).await?;
            aggregator.upload_background(file).await;
            bail_on_settings_alert(&aggregator)?;
        }
    }

    Ok(())
}

async fn selected_file(path: &Path) -> anyhow::Result<SelectedFile> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|err| anyhow::anyhow!("Cannot read {}: {err}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    let content_type = mime_guess::from_path(path).first_or_octet_stream().to_string();

    Ok(SelectedFile {
        file_name,
        content_type,
        data: data.into(),
    })
}

fn print_quizzes(quizzes: &[Quiz]) {
    if quizzes.is_empty() {
        println!("No quizzes created yet.");
        return;
    }

    println!(
        "{:<26} {:<32} {:>7} {:<10} {:<12} ID",
        "TITLE", "DESCRIPTION", "HINTS", "STATUS", "CREATED"
    );
    for quiz in quizzes {
        let description = quiz.description.as_deref().unwrap_or("No description");
        let status = if quiz.is_active { "active" } else { "inactive" };
        let created = quiz
            .created_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<26} {:<32} {:>7} {:<10} {:<12} {}",
            truncate(&quiz.title, 24),
            truncate(description, 30),
            format!("{}/{}", quiz.question_count(), QUESTION_SLOTS),
            status,
            created,
            quiz.id,
        );
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}…")
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn bail_on_alert<A, N>(controller: &QuizListController<A, N>) -> anyhow::Result<()>
where
    A: QuizApi,
    N: Notifier,
{
    match controller.alert() {
        Some(alert) => anyhow::bail!("{alert}"),
        None => Ok(()),
    }
}

fn bail_on_settings_alert<A, N>(aggregator: &SettingsAggregator<A, N>) -> anyhow::Result<()>
where
    A: SettingsApi,
    N: Notifier,
{
    match aggregator.alert() {
        Some(alert) => anyhow::bail!("{alert}"),
        None => Ok(()),
    }
}
