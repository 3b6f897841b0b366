use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use eduadmin_cli::cli::{load_table, BannerPrinter, Session, Status, TerminalPage};
use eduadmin_core::admin::{ContentUpload, PublicationDraft, WarningDetails};
use eduadmin_core::clipboard::copy_to_clipboard;
use eduadmin_core::format::{format_date, format_file_size};
use eduadmin_core::profile::ProfileUpdate;
use eduadmin_core::stats::fetch_stats;
use eduadmin_core::table::DEFAULT_EXPORT_NAME;
use eduadmin_core::tracing_setup::init_tracing;
use eduadmin_core::{ClientConfig, DashboardStats, ResourceAction};

#[derive(Parser)]
#[command(name = "eduadmin")]
#[command(about = "Terminal client for the platform's admin and profile pages")]
struct Cli {
    /// Path to JSON config file (baseUrl, sessionCookie, delays)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y')]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Activate or deactivate a user account
    ToggleUserActive { user_id: u64 },

    /// Mark a user as verified
    VerifyUser { user_id: u64 },

    DeleteContent { content_id: u64 },

    /// Switch a content between free and premium
    ToggleContentAccess { content_id: u64 },

    ApproveGroup { request_id: u64 },

    RejectGroup { request_id: u64 },

    DeletePublication { publication_id: u64 },

    ApproveProUpgrade { request_id: u64 },

    RejectProUpgrade { request_id: u64 },

    /// Send a warning to a user
    IssueWarning {
        user_id: u64,
        /// Name shown in the dialog
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, short = 'r')]
        reason: String,
        /// minor (default), major, ...
        #[arg(long = "type")]
        warning_type: Option<String>,
    },

    /// Upload a course file
    UploadContent {
        #[arg(long, short = 't')]
        title: String,
        #[arg(long)]
        content_type: String,
        #[arg(long, short = 'f')]
        file: PathBuf,
        #[arg(long, short = 'd')]
        description: Option<String>,
        /// free (default) or premium
        #[arg(long)]
        access_type: Option<String>,
        #[arg(long)]
        class_level: Option<String>,
        #[arg(long)]
        subject: Option<String>,
    },

    CreatePublication {
        #[arg(long, short = 't')]
        title: String,
        #[arg(long)]
        content: String,
        /// all (default), students, pro, ...
        #[arg(long)]
        audience: Option<String>,
    },

    /// Update the logged-in user's profile. Omitted fields are left unchanged.
    UpdateProfile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        class_level: Option<String>,
        #[arg(long)]
        filiere: Option<String>,
        #[arg(long)]
        picture: Option<PathBuf>,
    },

    ChangePassword {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },

    /// Dashboard counters
    Stats {
        /// Keep refreshing at the configured interval until Ctrl-C
        #[arg(long, short = 'w')]
        watch: bool,
    },

    /// Export a table dump (JSON array of rows, header first) as CSV
    ExportCsv {
        input: PathBuf,
        #[arg(long, short = 'o', default_value = DEFAULT_EXPORT_NAME)]
        output: PathBuf,
    },

    /// Print the rows of a table dump that match a search term
    Search { input: PathBuf, term: String },

    /// Human-readable file size
    FormatSize { bytes: u64 },

    /// Relative French wording for a server timestamp
    FormatDate { date: String },

    /// Copy text to the clipboard
    Copy { text: String },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match ClientConfig::discover(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let page = Arc::new(TerminalPage::stdio(cli.yes));
    let mut session = match Session::connect(config, page) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    let banners = BannerPrinter::new(session.feedback()).spawn(std::io::stderr());

    let status = run(cli.command, &mut session).await;
    banners.finish().await;

    match status {
        Ok(status) => std::process::exit(status.code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(command: Commands, session: &mut Session) -> Result<Status> {
    let status = match command {
        Commands::ToggleUserActive { user_id } => {
            session.dispatch(ResourceAction::ToggleUserActive, user_id).await
        }
        Commands::VerifyUser { user_id } => {
            session.dispatch(ResourceAction::VerifyUser, user_id).await
        }
        Commands::DeleteContent { content_id } => {
            session.dispatch(ResourceAction::DeleteContent, content_id).await
        }
        Commands::ToggleContentAccess { content_id } => {
            session
                .dispatch(ResourceAction::ToggleContentAccess, content_id)
                .await
        }
        Commands::ApproveGroup { request_id } => {
            session.dispatch(ResourceAction::ApproveGroup, request_id).await
        }
        Commands::RejectGroup { request_id } => {
            session.dispatch(ResourceAction::RejectGroup, request_id).await
        }
        Commands::DeletePublication { publication_id } => {
            session
                .dispatch(ResourceAction::DeletePublication, publication_id)
                .await
        }
        Commands::ApproveProUpgrade { request_id } => {
            session
                .dispatch(ResourceAction::ApproveProUpgrade, request_id)
                .await
        }
        Commands::RejectProUpgrade { request_id } => {
            session
                .dispatch(ResourceAction::RejectProUpgrade, request_id)
                .await
        }
        Commands::IssueWarning {
            user_id,
            name,
            reason,
            warning_type,
        } => {
            let admin = session.admin();
            admin.issue_warning(user_id, &name);
            let report = admin
                .submit_warning(WarningDetails {
                    reason,
                    warning_type,
                })
                .await;
            session.submitted(&report)
        }
        Commands::UploadContent {
            title,
            content_type,
            file,
            description,
            access_type,
            class_level,
            subject,
        } => {
            let report = session
                .admin()
                .upload_content(ContentUpload {
                    title,
                    description,
                    content_type,
                    access_type,
                    class_level,
                    subject,
                    file,
                })
                .await?;
            session.submitted(&report)
        }
        Commands::CreatePublication {
            title,
            content,
            audience,
        } => {
            let report = session
                .admin()
                .create_publication(PublicationDraft {
                    title,
                    content,
                    target_audience: audience,
                })
                .await;
            session.submitted(&report)
        }
        Commands::UpdateProfile {
            first_name,
            last_name,
            phone,
            class_level,
            filiere,
            picture,
        } => {
            let report = session
                .profile()
                .update_profile(ProfileUpdate {
                    first_name,
                    last_name,
                    phone,
                    class_level,
                    filiere,
                    profile_picture: picture,
                })
                .await?;
            session.submitted(&report)
        }
        Commands::ChangePassword { old, new } => {
            let report = session.profile().change_password(&old, &new).await;
            session.submitted(&report)
        }
        Commands::Stats { watch: false } => {
            let transport = session.transport();
            match fetch_stats(transport.as_ref()).await {
                Ok(Some(stats)) => {
                    session.observe(false);
                    print_stats(&stats);
                    Status::Ok
                }
                Ok(None) => {
                    session.observe(false);
                    eprintln!("Statistiques indisponibles");
                    Status::Failed
                }
                Err(e) => {
                    session.observe(e.is_transport());
                    tracing::warn!("Error fetching stats: {}", e);
                    Status::Failed
                }
            }
        }
        Commands::Stats { watch: true } => watch_stats(session).await,
        Commands::ExportCsv { input, output } => {
            load_table(&input)?.export_csv(&output, session.feedback())?;
            Status::Ok
        }
        Commands::Search { input, term } => {
            let mut table = load_table(&input)?;
            let visible = table.filter(&term);
            for row in table.visible_rows() {
                println!("{}", row.cells.join("\t"));
            }
            eprintln!("{} résultat(s)", visible);
            Status::Ok
        }
        Commands::FormatSize { bytes } => {
            println!("{}", format_file_size(bytes));
            Status::Ok
        }
        Commands::FormatDate { date } => match format_date(&date, chrono::Utc::now()) {
            Some(text) => {
                println!("{}", text);
                Status::Ok
            }
            None => {
                eprintln!("Date invalide: {}", date);
                Status::Failed
            }
        },
        Commands::Copy { text } => match copy_to_clipboard(&text, session.feedback()) {
            Some(_) => Status::Ok,
            None => Status::Failed,
        },
    };
    Ok(status)
}

async fn watch_stats(session: &mut Session) -> Status {
    let mut admin = session.admin();
    admin.open(true);
    let Some(mut updates) = admin.stats_updates() else {
        return Status::Failed;
    };
    eprintln!(
        "Actualisation toutes les {} s (Ctrl-C pour quitter)",
        session.config().stats_interval().as_secs()
    );

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = *updates.borrow_and_update();
                if let Some(stats) = latest {
                    print_stats(&stats);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    admin.close();
    Status::Ok
}

fn print_stats(stats: &DashboardStats) {
    for (name, value) in stats.entries() {
        println!("{:<16} {}", name, value);
    }
}
