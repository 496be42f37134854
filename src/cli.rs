// src/cli.rs
//! Command-line surface. Each subcommand plays the part of one of the
//! service's views: it builds the client stack, runs the session gate for
//! protected commands, and renders plain-text output.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::{AnalysisPhase, AnalysisWorkflow};
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::credentials::CredentialStore;
use crate::gate::{self, RouteAccess};
use crate::resources::{Confirmation, ResourceOrchestrator};
use crate::session::{AuthError, SessionManager};
use crate::types::{AnalysisRecord, NewJobDescription};

#[derive(Parser)]
#[command(name = "cvmatch")]
#[command(about = "Client for the resume ATS analyzer service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account and sign in
    Register {
        email: String,
        username: String,
        password: String,
        password_confirm: String,
    },
    /// Sign in with email and password
    Login { email: String, password: String },
    /// Sign out and clear stored credentials
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Manage uploaded resumes
    Resume {
        #[command(subcommand)]
        command: ResumeCommand,
    },
    /// Manage stored job descriptions
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },
    /// Score a resume against a job description
    Analyze {
        resume_id: i64,
        job_description_id: i64,
    },
    /// List past analyses
    History,
    /// Show dashboard statistics
    Stats,
}

#[derive(Subcommand)]
pub enum ResumeCommand {
    /// List uploaded resumes
    List,
    /// Upload a resume file (PDF or DOCX)
    Upload { file: PathBuf },
    /// Delete a resume by id
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// List saved job descriptions
    List,
    /// Save a new job description
    Add {
        title: String,
        description: String,
        #[arg(long)]
        company: Option<String>,
    },
    /// Delete a job description by id
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = ClientConfig::load()?;
    let api = Arc::new(ApiClient::new(
        config.api_base_url.clone(),
        config.timeout_seconds,
    )?);
    let store = CredentialStore::new(config.credentials_dir.clone());
    let mut session = SessionManager::new(api.clone(), store);

    match cli.command {
        Command::Register {
            email,
            username,
            password,
            password_confirm,
        } => {
            session
                .register(&email, &username, &password, &password_confirm)
                .await
                .map_err(|e| anyhow::anyhow!(render_auth_error(&e)))?;
            println!("✅ Registered and signed in as {}", email);
        }

        Command::Login { email, password } => {
            session
                .login(&email, &password)
                .await
                .map_err(|e| anyhow::anyhow!(render_auth_error(&e)))?;
            println!("✅ Signed in as {}", email);
        }

        Command::Logout => {
            session.logout();
            println!("✅ Signed out");
        }

        Command::Whoami => {
            authorize(&mut session).await?;
            if let Some(user) = session.user() {
                println!("{} <{}> (id {})", user.username, user.email, user.id);
            }
        }

        Command::Resume { command } => {
            authorize(&mut session).await?;
            let mut resources = ResourceOrchestrator::new(api.clone());
            handle_resume_command(command, &mut resources).await?;
        }

        Command::Job { command } => {
            authorize(&mut session).await?;
            let mut resources = ResourceOrchestrator::new(api.clone());
            handle_job_command(command, &mut resources).await?;
        }

        Command::Analyze {
            resume_id,
            job_description_id,
        } => {
            authorize(&mut session).await?;
            let mut workflow = AnalysisWorkflow::new(api.clone());
            workflow.load_choices().await;
            if let Some(e) = &workflow.resumes.error {
                println!("⚠️  {}", e);
            }
            if let Some(e) = &workflow.jobs.error {
                println!("⚠️  {}", e);
            }
            if workflow.resumes.items.is_empty() && workflow.resumes.error.is_none() {
                println!("⚠️  No resumes uploaded. Run `cvmatch resume upload <file>` first.");
            }
            if workflow.jobs.items.is_empty() && workflow.jobs.error.is_none() {
                println!("⚠️  No job descriptions saved. Run `cvmatch job add` first.");
            }

            workflow.select_resume(Some(resume_id));
            workflow.select_job(Some(job_description_id));
            workflow.submit().await;

            match workflow.phase() {
                AnalysisPhase::Complete(record) => print_analysis(record),
                AnalysisPhase::Failed(message) => anyhow::bail!("{}", message),
                AnalysisPhase::Idle | AnalysisPhase::Submitting => {
                    anyhow::bail!("Analysis did not complete")
                }
            }
        }

        Command::History => {
            authorize(&mut session).await?;
            let mut resources = ResourceOrchestrator::new(api.clone());
            resources.fetch_analyses().await;
            if let Some(e) = &resources.analyses.error {
                anyhow::bail!("{}", e);
            }
            if resources.analyses.items.is_empty() {
                println!("No analyses found. Run `cvmatch analyze` to create one.");
            } else {
                println!(
                    "{:<6} {:<7} {:<30} {:<30} {:<12}",
                    "ID", "Score", "Resume", "Job", "Date"
                );
                for record in &resources.analyses.items {
                    println!(
                        "{:<6} {:<7} {:<30} {:<30} {:<12}",
                        record.id,
                        format!("{}%", record.report.ats_score),
                        record.resume.original_filename,
                        record.job_description.title,
                        record.created_at.format("%Y-%m-%d")
                    );
                }
            }
        }

        Command::Stats => {
            authorize(&mut session).await?;
            let resources = ResourceOrchestrator::new(api.clone());
            let stats = resources
                .dashboard_stats()
                .await
                .map_err(|_| anyhow::anyhow!("Failed to load dashboard data"))?;
            println!("Resumes:          {}", stats.total_resumes);
            println!("Job descriptions: {}", stats.total_jobs);
            println!("Analyses:         {}", stats.total_analyses);
            println!("Average ATS:      {}%", stats.average_ats_score);
            if !stats.recent_analyses.is_empty() {
                println!();
                println!("Recent analyses:");
                for record in &stats.recent_analyses {
                    println!(
                        "  {}%  {} vs {}",
                        record.report.ats_score,
                        record.resume.original_filename,
                        record.job_description.title
                    );
                }
            }
        }
    }

    Ok(())
}

/// Gate every protected command on the bootstrapped session state.
async fn authorize(session: &mut SessionManager) -> Result<()> {
    session.bootstrap().await;
    match gate::evaluate(session.state()) {
        RouteAccess::Granted => Ok(()),
        RouteAccess::RedirectToLogin => {
            anyhow::bail!("Not signed in. Run `cvmatch login <email> <password>` first.")
        }
        RouteAccess::Pending => anyhow::bail!("Session is still starting up, try again"),
    }
}

async fn handle_resume_command(
    command: ResumeCommand,
    resources: &mut ResourceOrchestrator,
) -> Result<()> {
    match command {
        ResumeCommand::List => {
            resources.fetch_resumes().await;
            if let Some(e) = &resources.resumes.error {
                anyhow::bail!("{}", e);
            }
            if resources.resumes.items.is_empty() {
                println!("No resumes uploaded yet.");
            } else {
                println!("{:<6} {:<40} {:<6} {:<12}", "ID", "Filename", "Type", "Uploaded");
                for resume in &resources.resumes.items {
                    println!(
                        "{:<6} {:<40} {:<6} {:<12}",
                        resume.id,
                        resume.original_filename,
                        resume.file_type,
                        resume.uploaded_at.format("%Y-%m-%d")
                    );
                }
            }
        }

        ResumeCommand::Upload { file } => {
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow::anyhow!("Invalid file path: {}", file.display()))?
                .to_string();
            let bytes = tokio::fs::read(&file)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;

            if resources.upload_resume(&file_name, bytes).await {
                println!("✅ Resume uploaded successfully!");
            } else if let Some(e) = &resources.resumes.error {
                anyhow::bail!("{}", e);
            }
        }

        ResumeCommand::Delete { id, yes } => {
            let confirmation = if yes {
                Confirmation::Confirmed
            } else {
                confirm("Are you sure you want to delete this resume?")?
            };
            if confirmation == Confirmation::Declined {
                println!("Aborted.");
                return Ok(());
            }
            if resources.delete_resume(id, confirmation).await {
                println!("✅ Resume deleted successfully!");
            } else if let Some(e) = &resources.resumes.error {
                anyhow::bail!("{}", e);
            }
        }
    }
    Ok(())
}

async fn handle_job_command(
    command: JobCommand,
    resources: &mut ResourceOrchestrator,
) -> Result<()> {
    match command {
        JobCommand::List => {
            resources.fetch_jobs().await;
            if let Some(e) = &resources.jobs.error {
                anyhow::bail!("{}", e);
            }
            if resources.jobs.items.is_empty() {
                println!("No job descriptions saved yet.");
            } else {
                println!("{:<6} {:<30} {:<20} {:<12}", "ID", "Title", "Company", "Created");
                for job in &resources.jobs.items {
                    println!(
                        "{:<6} {:<30} {:<20} {:<12}",
                        job.id,
                        job.title,
                        job.company.as_deref().unwrap_or("-"),
                        job.created_at.format("%Y-%m-%d")
                    );
                }
            }
        }

        JobCommand::Add {
            title,
            description,
            company,
        } => {
            let job = NewJobDescription {
                title,
                company,
                description,
            };
            if resources.create_job(&job).await {
                println!("✅ Job description saved successfully!");
            } else if let Some(e) = &resources.jobs.error {
                anyhow::bail!("{}", e);
            }
        }

        JobCommand::Delete { id, yes } => {
            let confirmation = if yes {
                Confirmation::Confirmed
            } else {
                confirm("Are you sure you want to delete this job description?")?
            };
            if confirmation == Confirmation::Declined {
                println!("Aborted.");
                return Ok(());
            }
            if resources.delete_job(id, confirmation).await {
                println!("✅ Job description deleted successfully!");
            } else if let Some(e) = &resources.jobs.error {
                anyhow::bail!("{}", e);
            }
        }
    }
    Ok(())
}

fn print_analysis(record: &AnalysisRecord) {
    println!("🎯 ATS Score: {}%", record.report.ats_score);
    println!();
    println!("Extracted skills: {}", join_or_none(&record.report.extracted_skills));
    println!("Matched skills:   {}", join_or_none(&record.report.matched_skills));
    println!("Missing keywords: {}", join_or_none(&record.report.missing_keywords));
    println!();
    println!("Recommendations:");
    println!("{}", record.report.recommendations);
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// The user-facing side of the delete precondition: deletion only proceeds
/// on an explicit yes.
fn confirm(prompt: &str) -> Result<Confirmation> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    if answer.trim().eq_ignore_ascii_case("y") {
        Ok(Confirmation::Confirmed)
    } else {
        Ok(Confirmation::Declined)
    }
}

/// Registration rejections keep their field structure; everything else is
/// already a message.
fn render_auth_error(error: &AuthError) -> String {
    match error {
        AuthError::Fields(value) => match value.as_object() {
            Some(fields) => fields
                .iter()
                .map(|(field, messages)| {
                    let text = match messages {
                        serde_json::Value::Array(items) => items
                            .iter()
                            .filter_map(|m| m.as_str())
                            .collect::<Vec<_>>()
                            .join("; "),
                        other => other.to_string(),
                    };
                    format!("{}: {}", field, text)
                })
                .collect::<Vec<_>>()
                .join("\n"),
            None => value.to_string(),
        },
        other => other.to_string(),
    }
}
