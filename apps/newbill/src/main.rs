use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    validate_attachment, AttachmentCheck, BillFormFields, BillStore, ControllerOutcome,
    FileSelection, FileSessionStore, FormEvent, HttpBillStore, MemoryBillStore,
    RecordingNavigator, SelectedFile, SessionStore, SubmissionController, SubmissionError,
    SubmissionEvent,
};
use shared::domain::Bill;
use tracing::{info, warn};

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Submit employee expense bills")]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    session_file: Option<PathBuf>,
    /// Use a process-local store instead of the bills API.
    #[arg(long)]
    offline: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a receipt and submit a new bill.
    Submit {
        #[arg(long)]
        file: PathBuf,
        #[arg(long = "type")]
        expense_type: String,
        #[arg(long)]
        name: String,
        /// Defaults to today.
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        vat: String,
        #[arg(long, default_value = "")]
        pct: String,
        #[arg(long, default_value = "")]
        commentary: String,
    },
    /// Print the bills visible to the signed-in user.
    List,
    /// Check whether a file name is an accepted receipt attachment.
    Validate { file_name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(session_file) = cli.session_file {
        settings.session_file = session_file.display().to_string();
    }
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    if let Command::Validate { file_name } = &cli.command {
        match validate_attachment(file_name) {
            AttachmentCheck::Accepted(format) => {
                println!("accepted ({})", format.mime_type());
            }
            AttachmentCheck::Rejected => bail!("rejected: only jpg, jpeg and png are accepted"),
        }
        return Ok(());
    }

    let session: Arc<dyn SessionStore> = Arc::new(
        FileSessionStore::open(&settings.session_file)
            .with_context(|| format!("failed to load session '{}'", settings.session_file))?,
    );
    let store: Arc<dyn BillStore> = if cli.offline {
        warn!("offline mode: bills are kept in memory only");
        Arc::new(MemoryBillStore::new())
    } else {
        Arc::new(HttpBillStore::new(&settings.api_url)?.with_token(session.token()))
    };

    match cli.command {
        Command::Submit {
            file,
            expense_type,
            name,
            date,
            amount,
            vat,
            pct,
            commentary,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read '{}'", file.display()))?;
            let fields = BillFormFields {
                expense_type,
                name,
                date: date.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string()),
                amount,
                vat,
                pct,
                commentary,
            };
            submit(
                session,
                store,
                SelectedFile::new(&file.display().to_string(), bytes),
                fields,
            )
            .await?;
        }
        Command::List => {
            let bills = store.list().await.context("failed to list bills")?;
            println!("{}", serde_json::to_string_pretty(&bills)?);
        }
        Command::Validate { .. } => {}
    }

    Ok(())
}

async fn submit(
    session: Arc<dyn SessionStore>,
    store: Arc<dyn BillStore>,
    file: SelectedFile,
    fields: BillFormFields,
) -> Result<()> {
    let navigator = Arc::new(RecordingNavigator::new());
    let controller = SubmissionController::new(session, navigator.clone(), store);

    let mut events = controller.subscribe_events();
    let notices = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SubmissionEvent::AttachmentRejected { notice, .. }
                | SubmissionEvent::UploadFailed { notice, .. }
                | SubmissionEvent::SubmitFailed { notice } => {
                    warn!(category = ?notice.category(), "{}", notice.message());
                }
                SubmissionEvent::UploadCompleted { upload, .. } => {
                    info!(file_url = %upload.file_url, "receipt uploaded");
                }
                _ => {}
            }
        }
    });

    let result = fill_form(&controller, file, fields).await;
    // Closing the channel lets the notice task drain and exit.
    drop(controller);
    let _ = notices.await;
    let bill = result?;

    println!("{}", serde_json::to_string_pretty(&bill)?);
    if let Some(route) = navigator.last() {
        println!("-> {}", route.path());
    }
    Ok(())
}

async fn fill_form(
    controller: &SubmissionController,
    file: SelectedFile,
    fields: BillFormFields,
) -> Result<Bill> {
    let selected = controller.handle(FormEvent::FileSelected(file)).await?;
    if let ControllerOutcome::File(FileSelection::Rejected { file_name }) = selected {
        return Err(SubmissionError::InvalidAttachment { file_name }.into());
    }

    let ControllerOutcome::Submitted(bill) = controller.handle(FormEvent::Submit(fields)).await?
    else {
        bail!("form submission produced no bill");
    };
    Ok(bill)
}
