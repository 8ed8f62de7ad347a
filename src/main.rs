mod analytics;
mod catalog;
mod error;
mod models;
mod persistence;
mod platform;
mod tui;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use error::PlatformError;
use models::{
    DifficultyLevel, JsonOutput, LearnerResponse, LearningModule, ModuleCategory, UserRole,
};
use platform::Platform;

const DEFAULT_DATA_NAME: &str = "literacy.json";
const DEFAULT_LOG_FILTER: &str = "literacy=warn";

#[derive(Parser)]
#[command(name = "literacy")]
#[command(about = "An AI literacy learning platform: modules, scenarios and progress tracking")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh data file with the sample catalogue
    Init,

    /// Manage users
    #[command(subcommand)]
    User(UserCommands),

    /// Manage learning modules
    #[command(subcommand)]
    Module(ModuleCommands),

    /// Browse scenarios
    #[command(subcommand)]
    Scenario(ScenarioCommands),

    /// Report completion progress on a module
    Progress {
        /// User ID
        user: Uuid,

        /// Module ID
        module: Uuid,

        /// Completion percentage (0-100)
        percent: f64,

        /// Minutes spent in this session
        #[arg(long, short, default_value_t = 0)]
        time: u32,
    },

    /// Record a quiz score for a module
    Quiz {
        /// User ID
        user: Uuid,

        /// Module ID
        module: Uuid,

        /// Score (0-100)
        score: f64,
    },

    /// Answer a module's assessment questions and record the grade
    Answer {
        /// User ID
        user: Uuid,

        /// Module ID
        module: Uuid,

        /// Comma-separated option indices, one per question
        #[arg(value_delimiter = ',', required = true)]
        answers: Vec<usize>,
    },

    /// Show the modules a user can start next
    Path {
        /// User ID
        user: Uuid,
    },

    /// Get feedback on a user's performance in a module
    Feedback {
        /// User ID
        user: Uuid,

        /// Module ID
        module: Uuid,

        /// Latest quiz score
        #[arg(long, short)]
        score: Option<f64>,

        /// Minutes spent
        #[arg(long, short)]
        time: Option<u32>,
    },

    /// Show class statistics (teachers only)
    Dashboard {
        /// Teacher ID
        teacher: Uuid,
    },

    /// Show a student's learning report
    Analytics {
        /// Student ID
        student: Uuid,
    },

    /// Recommend the next module for a user
    Recommend {
        /// User ID
        user: Uuid,
    },

    /// Launch interactive terminal UI
    Tui {
        /// Teacher whose dashboard is shown
        #[arg(long, short)]
        teacher: Option<Uuid>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user
    Add {
        /// Username
        username: String,

        /// Email address
        email: String,

        /// Role: student/teacher/admin
        #[arg(long, short, default_value = "student")]
        role: String,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum ModuleCommands {
    /// List all modules
    List {
        /// Filter by category
        #[arg(long, short)]
        category: Option<String>,
    },

    /// Show module details
    Show {
        /// Module ID
        id: Uuid,
    },

    /// Register a new module
    Add {
        /// Module title
        title: String,

        /// Category, e.g. ai_basics or ethics_bias
        #[arg(long, short)]
        category: String,

        /// Difficulty: beginner/intermediate/advanced
        #[arg(long = "difficulty", short = 'l')]
        difficulty: String,

        /// Module description
        #[arg(long, short)]
        description: Option<String>,

        /// Prerequisite module IDs
        #[arg(long = "prereq", short)]
        prerequisites: Vec<Uuid>,

        /// Estimated duration in minutes
        #[arg(long = "duration", default_value_t = LearningModule::DEFAULT_DURATION)]
        duration: u32,
    },
}

#[derive(Subcommand)]
enum ScenarioCommands {
    /// List all scenarios
    List,

    /// Show scenario details
    Show {
        /// Scenario ID
        id: Uuid,
    },

    /// Mark a scenario as completed within a module
    Complete {
        /// Scenario ID
        id: Uuid,

        /// User ID
        #[arg(long, short)]
        user: Uuid,

        /// Module ID
        #[arg(long, short)]
        module: Uuid,
    },
}

fn get_data_path() -> PathBuf {
    if let Ok(path) = std::env::var("LITERACY_DATA") {
        return PathBuf::from(path);
    }

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("literacy");

    std::fs::create_dir_all(&config_dir).ok();
    config_dir.join(DEFAULT_DATA_NAME)
}

fn init_logging() {
    let filter = std::env::var("LITERACY_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Existing data wins; a first run seeds the sample catalogue and saves it
fn open_platform(path: &Path) -> Result<Platform, PlatformError> {
    if path.exists() {
        return Platform::load(path);
    }

    tracing::info!(path = %path.display(), "no data file yet, saving sample catalogue");
    let platform = Platform::with_sample_content();
    platform.save(path)?;
    Ok(platform)
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_path = get_data_path();

    // init always starts over, even when the existing file is unreadable
    let mut platform = match cli.command {
        Commands::Init => Platform::with_sample_content(),
        _ => open_platform(&data_path)?,
    };

    match cli.command {
        Commands::Init => {
            platform.save(&data_path)?;
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
            } else {
                println!("Platform data initialized at: {}", data_path.display());
            }
        }

        Commands::User(user_cmd) => match user_cmd {
            UserCommands::Add {
                username,
                email,
                role,
            } => {
                let role = UserRole::from_str(&role).ok_or_else(|| {
                    format!("Invalid role '{}'. Use: student, teacher, or admin", role)
                })?;
                let user = platform.create_user(username, email, role).clone();
                platform.save(&data_path)?;

                if cli.json {
                    emit_json(&user)?;
                } else {
                    println!(
                        "Created {} '{}' with ID: {}",
                        user.role.as_str(),
                        user.username,
                        user.id
                    );
                }
            }

            UserCommands::List => {
                let mut users: Vec<_> = platform.users().collect();
                users.sort_by(|a, b| a.username.cmp(&b.username));
                if cli.json {
                    emit_json(&users)?;
                } else if users.is_empty() {
                    println!("No users found.");
                } else {
                    println!("{:<38} {:<20} {:<9} EMAIL", "ID", "USERNAME", "ROLE");
                    println!("{}", "-".repeat(90));
                    for user in users {
                        println!(
                            "{:<38} {:<20} {:<9} {}",
                            user.id,
                            truncate(&user.username, 18),
                            user.role.as_str(),
                            user.email
                        );
                    }
                }
            }
        },

        Commands::Module(module_cmd) => match module_cmd {
            ModuleCommands::List { category } => {
                let category = category
                    .map(|c| {
                        ModuleCategory::from_str(&c)
                            .ok_or_else(|| format!("Invalid category '{}'", c))
                    })
                    .transpose()?;

                let mut modules: Vec<_> = platform
                    .modules()
                    .filter(|m| category.map_or(true, |c| m.category == c))
                    .collect();
                modules.sort_by(|a, b| {
                    a.difficulty
                        .cmp(&b.difficulty)
                        .then_with(|| a.title.cmp(&b.title))
                });

                if cli.json {
                    emit_json(&modules)?;
                } else if modules.is_empty() {
                    println!("No modules found.");
                } else {
                    println!(
                        "{:<38} {:<40} {:<18} LEVEL",
                        "ID", "TITLE", "CATEGORY"
                    );
                    println!("{}", "-".repeat(110));
                    for module in modules {
                        println!(
                            "{:<38} {:<40} {:<18} {}",
                            module.id,
                            truncate(&module.title, 38),
                            module.category.label(),
                            module.difficulty.label()
                        );
                    }
                }
            }

            ModuleCommands::Show { id } => {
                let Some(module) = platform.module(&id) else {
                    return fail(cli.json, PlatformError::ModuleNotFound(id));
                };

                if cli.json {
                    emit_json(module)?;
                } else {
                    println!("Module: {}", module.title);
                    println!("ID: {}", module.id);
                    println!("Description: {}", module.description);
                    println!(
                        "Category: {} ({})",
                        module.category.label(),
                        module.category.as_str()
                    );
                    println!(
                        "Difficulty: {} ({})",
                        module.difficulty.label(),
                        module.difficulty.as_str()
                    );
                    println!("Duration: {} minutes", module.estimated_duration);

                    if !module.prerequisites.is_empty() {
                        println!();
                        println!("--- Prerequisites ---");
                        for prereq in &module.prerequisites {
                            let title = platform
                                .module(prereq)
                                .map(|m| m.title.as_str())
                                .unwrap_or("(unknown module)");
                            println!("  {} ({})", title, prereq);
                        }
                    }

                    if !module.content_blocks.is_empty() {
                        println!();
                        println!("--- Content ---");
                        for block in &module.content_blocks {
                            println!("  [{}] {}", block.kind.label(), block.title);
                            println!("      {}", block.content);
                        }
                    }

                    if !module.assessment_questions.is_empty() {
                        println!();
                        println!("--- Assessment ---");
                        for (i, question) in module.assessment_questions.iter().enumerate() {
                            println!("  Q{}: {}", i + 1, question.question);
                            for (j, option) in question.options.iter().enumerate() {
                                println!("      {}. {}", j, option);
                            }
                        }
                    }
                }
            }

            ModuleCommands::Add {
                title,
                category,
                difficulty,
                description,
                prerequisites,
                duration,
            } => {
                let category = ModuleCategory::from_str(&category)
                    .ok_or_else(|| format!("Invalid category '{}'", category))?;
                let difficulty = DifficultyLevel::from_str(&difficulty).ok_or_else(|| {
                    format!(
                        "Invalid difficulty '{}'. Use: beginner, intermediate, or advanced",
                        difficulty
                    )
                })?;

                let mut module = LearningModule::new(
                    title,
                    description.unwrap_or_default(),
                    category,
                    difficulty,
                );
                module.prerequisites = prerequisites;
                module.estimated_duration = duration;
                let title = module.title.clone();

                let id = match platform.add_module(module) {
                    Ok(id) => id,
                    Err(e) => return fail(cli.json, e),
                };
                platform.save(&data_path)?;

                if cli.json {
                    emit_json(serde_json::json!({ "id": id, "title": title }))?;
                } else {
                    println!("Added module '{}' with ID: {}", title, id);
                }
            }
        },

        Commands::Scenario(scenario_cmd) => match scenario_cmd {
            ScenarioCommands::List => {
                let scenarios: Vec<_> = platform.scenarios().collect();
                if cli.json {
                    emit_json(&scenarios)?;
                } else if scenarios.is_empty() {
                    println!("No scenarios found.");
                } else {
                    for scenario in scenarios {
                        println!("{:<38} {}", scenario.id, scenario.title);
                    }
                }
            }

            ScenarioCommands::Show { id } => {
                let Some(scenario) = platform.scenario(&id) else {
                    return fail(cli.json, PlatformError::ScenarioNotFound(id));
                };

                if cli.json {
                    emit_json(scenario)?;
                } else {
                    println!("Scenario: {}", scenario.title);
                    println!("Context: {}", scenario.context);
                    println!("Challenge: {}", scenario.challenge);
                    println!();
                    println!("--- Decision Options ---");
                    for (i, option) in scenario.options.iter().enumerate() {
                        println!("  {}. {}", i + 1, option.text);
                        println!("     Consequence: {}", option.consequence);
                        println!("     Ethics score: {}/10", option.ethics_score);
                    }
                    if let Some(best) = scenario.most_ethical_option() {
                        println!();
                        println!("Most ethical choice: {}", best.text);
                    }
                    println!();
                    println!("--- Ethical Considerations ---");
                    for item in &scenario.ethical_considerations {
                        println!("  - {}", item);
                    }
                    println!();
                    println!("--- Learning Objectives ---");
                    for item in &scenario.learning_objectives {
                        println!("  - {}", item);
                    }
                }
            }

            ScenarioCommands::Complete { id, user, module } => {
                if let Err(e) = platform.record_scenario_completion(&user, &module, &id) {
                    return fail(cli.json, e);
                }
                platform.save(&data_path)?;

                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
                } else {
                    println!("Scenario {} marked complete.", id);
                }
            }
        },

        Commands::Progress {
            user,
            module,
            percent,
            time,
        } => {
            if let Err(e) = platform.update_progress(&user, &module, percent, time) {
                return fail(cli.json, e);
            }
            platform.save(&data_path)?;

            if cli.json {
                emit_json(platform.progress(&user, &module))?;
            } else if let Some(progress) = platform.progress(&user, &module) {
                println!("Progress recorded for module {}.", module);
                println!(
                    "Completion: {:.1}% (best), time spent: {} minutes",
                    progress.completion_percentage, progress.time_spent
                );
            }
        }

        Commands::Quiz {
            user,
            module,
            score,
        } => {
            if let Err(e) = platform.record_quiz_score(&user, &module, score) {
                return fail(cli.json, e);
            }
            platform.save(&data_path)?;

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
            } else {
                println!("Quiz score {:.1} recorded for module {}.", score, module);
            }
        }

        Commands::Answer {
            user,
            module,
            answers,
        } => {
            let score = match platform.submit_quiz(&user, &module, &answers) {
                Ok(score) => score,
                Err(e) => return fail(cli.json, e),
            };
            platform.save(&data_path)?;

            if cli.json {
                emit_json(serde_json::json!({ "score": score }))?;
            } else {
                println!("Scored {:.0}%.", score);
            }
        }

        Commands::Path { user } => {
            let path = platform.personalized_learning_path(&user);
            if cli.json {
                emit_json(&path)?;
            } else if path.is_empty() {
                println!("No modules available.");
            } else {
                println!("=== Learning Path ===");
                for (i, module) in path.iter().enumerate() {
                    let prereqs = if module.prerequisites.is_empty() {
                        String::new()
                    } else {
                        format!(" (requires {} prerequisites)", module.prerequisites.len())
                    };
                    println!(
                        "{}. {} - {}{}",
                        i + 1,
                        module.title,
                        module.difficulty.label(),
                        prereqs
                    );
                }
            }
        }

        Commands::Feedback {
            user,
            module,
            score,
            time,
        } => {
            let response = LearnerResponse {
                quiz_score: score,
                time_spent: time,
                ..Default::default()
            };
            let feedback = match platform.adaptive_feedback(&user, &module, &response) {
                Ok(feedback) => feedback,
                Err(e) => return fail(cli.json, e),
            };

            if cli.json {
                emit_json(&feedback)?;
            } else if feedback.message.is_empty() {
                println!("No progress recorded for this module yet.");
            } else {
                println!("Feedback: {}", feedback.message);
                for suggestion in &feedback.suggestions {
                    println!("  - {}", suggestion);
                }
                match feedback.difficulty_adjustment {
                    d if d > 0 => println!("Suggested difficulty: step up"),
                    d if d < 0 => println!("Suggested difficulty: step down"),
                    _ => println!("Suggested difficulty: keep going"),
                }
            }
        }

        Commands::Dashboard { teacher } => {
            let dashboard = match platform.teacher_dashboard(&teacher) {
                Ok(dashboard) => dashboard,
                Err(e) => return fail(cli.json, e),
            };

            if cli.json {
                emit_json(&dashboard)?;
            } else {
                println!("=== Class Overview ===");
                println!("Total students: {}", dashboard.total_students);
                println!();
                println!("--- Module Completion Rates ---");
                for module in &dashboard.module_completion_rates {
                    println!(
                        "  {:<40} {:>5.1}%",
                        truncate(&module.title, 38),
                        module.completion_rate
                    );
                }
                println!();
                println!("--- Students ---");
                for student in &dashboard.student_progress {
                    println!(
                        "  {:<20} {:>5.1}% complete  {:>4} min  last active {}",
                        truncate(&student.student_name, 18),
                        student.completion_rate,
                        student.time_spent,
                        student.last_active.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }

        Commands::Analytics { student } => {
            let analytics = match platform.student_analytics(&student) {
                Ok(analytics) => analytics,
                Err(e) => return fail(cli.json, e),
            };

            if cli.json {
                emit_json(&analytics)?;
            } else {
                println!("Student: {}", analytics.student_info.name);
                println!("Joined: {}", analytics.student_info.join_date);
                println!("Overall progress: {:.1}%", analytics.overall_progress);
                println!("Total time spent: {} minutes", analytics.total_time_spent);
                println!("Average quiz score: {:.1}", analytics.average_quiz_score);
                println!("Modules completed: {}", analytics.modules_completed);
                println!("Modules in progress: {}", analytics.modules_in_progress);
            }
        }

        Commands::Recommend { user } => {
            let recommended = platform.recommend_next_module(&user);
            if cli.json {
                emit_json(recommended)?;
            } else if let Some(module) = recommended {
                println!("Recommended: {} (ID: {})", module.title, module.id);
                println!("Difficulty: {}", module.difficulty.label());
                println!("Category: {}", module.category.label());
            } else {
                println!("No modules available.");
            }
        }

        Commands::Tui { teacher } => {
            tui::run(platform, data_path, teacher)?;
        }
    }

    Ok(())
}

fn emit_json<T: Serialize>(data: T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(&JsonOutput::ok(data))?);
    Ok(())
}

// JSON callers get an error envelope; everyone else gets a non-zero exit
fn fail(json: bool, err: PlatformError) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!(error = %err, not_found = err.is_not_found(), "command failed");

    if json {
        println!(
            "{}",
            serde_json::to_string(&JsonOutput::<()>::err(err.to_string()))?
        );
        Ok(())
    } else {
        Err(err.into())
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
