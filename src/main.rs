use std::process;

use reybex::{
    application::{
        board::BoardService,
        error::AppError,
        inbox::InboxService,
        render::render_description,
        session::{SessionService, require_user_id},
        tasks::{TaskQuery, TaskService},
        tracker::{TrackerController, TrackerStatus},
        tracking::TrackingService,
    },
    config::{self, BoardArgs, Command, LoginArgs, RenderArgs, Settings, TaskArgs, TrackCommand},
    domain::{board::KanbanTab, session::Session},
    infra::{error::InfraError, http::ReybexClient, session_store::SessionStore, telemetry},
    presentation::console::{print_json, print_line, tracker_line},
};
use reybex_api_types::EntityId;
use tokio::{fs, signal};
use tracing::{Dispatch, Level, debug, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(error = %report.joined(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %report.joined(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let app = Application::build(&settings)?;
    match cli_args.command {
        Command::Render(args) => run_render(args).await,
        Command::Login(args) => app.login(args).await,
        Command::Logout => app.logout().await,
        command => {
            let session = app.sessions.require().await?;
            let result = app.run_authenticated(&session, command).await;
            match result {
                Ok(()) => Ok(()),
                Err(err) => Err(app.sessions.expire_on_unauthorized(err).await),
            }
        }
    }
}

async fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let raw = fs::read_to_string(&args.file)
        .await
        .map_err(InfraError::from)?;
    debug!(
        target = "reybex::render",
        path = %args.file.display(),
        bytes = raw.len(),
        "Rendering document file"
    );
    print_line(&render_description(&raw))
}

struct Application {
    sessions: SessionService,
    tracker: TrackerController,
    sprint_id: EntityId,
    last_comments_export_id: EntityId,
}

impl Application {
    fn build(settings: &Settings) -> Result<Self, AppError> {
        let client = ReybexClient::new(settings.api.base_url.clone(), settings.api.timeout)?;
        let store = SessionStore::new(settings.session.path.clone());
        let sessions = SessionService::new(client, store, settings.api.file_base_url.clone());

        Ok(Self {
            sessions,
            tracker: TrackerController::new(settings.tracker.tick_interval),
            sprint_id: settings.board.sprint_id.clone(),
            last_comments_export_id: settings.board.last_comments_export_id.clone(),
        })
    }

    async fn login(&self, args: LoginArgs) -> Result<(), AppError> {
        let password = read_password(&args).await?;
        let session = self.sessions.login(&args.username, &password).await?;
        print_json(&self.sessions.profile(&session))
    }

    async fn logout(&self) -> Result<(), AppError> {
        self.sessions.logout(&self.tracker).await?;
        print_line("logged out")
    }

    async fn run_authenticated(&self, session: &Session, command: Command) -> Result<(), AppError> {
        let client = self.sessions.client_for(session);
        match command {
            Command::Whoami => print_json(&self.sessions.profile(session)),
            Command::Board(args) => self.board(client, session, args).await,
            Command::Task(args) => self.task(client, args).await,
            Command::Tickets => {
                let inbox = InboxService::new(client, self.last_comments_export_id.clone());
                print_json(&inbox.tickets(session).await?)
            }
            Command::LastComments => {
                let inbox = InboxService::new(client, self.last_comments_export_id.clone());
                print_json(&inbox.last_comments(session).await?)
            }
            Command::Track(args) => self.track(client, args.command).await,
            Command::Login(_) | Command::Logout | Command::Render(_) => Err(AppError::unexpected(
                "command does not need an authenticated session",
            )),
        }
    }

    async fn board(
        &self,
        client: ReybexClient,
        session: &Session,
        args: BoardArgs,
    ) -> Result<(), AppError> {
        let user_id = require_user_id(session)?;
        let service = BoardService::new(client, self.sprint_id.clone());
        let view = service
            .board(user_id, args.tab.unwrap_or(KanbanTab::Todo))
            .await?;
        print_json(&view)
    }

    async fn task(&self, client: ReybexClient, args: TaskArgs) -> Result<(), AppError> {
        let task_id = parse_task_id(&args.id)?;
        let query = TaskQuery {
            comments: args.comments,
            history: args.history,
        };
        let view = TaskService::new(client).task(&task_id, query).await?;
        print_json(&view)
    }

    async fn track(&self, client: ReybexClient, command: TrackCommand) -> Result<(), AppError> {
        let tracking = TrackingService::new(client, self.tracker.clone());
        match command {
            TrackCommand::Status => {
                let view = tracking.refresh().await?;
                print_line(&tracker_line(&view))
            }
            TrackCommand::Start { task_id } => {
                let view = tracking.start(&parse_task_id(&task_id)?).await?;
                print_line(&tracker_line(&view))
            }
            TrackCommand::Stop => {
                let view = tracking.stop().await?;
                print_line(&tracker_line(&view))
            }
            TrackCommand::Watch { ticks } => watch(&tracking, ticks).await,
        }
    }
}

/// Print the timer on every change until it goes idle, `ticks` updates have
/// been printed, or the process is interrupted.
async fn watch(tracking: &TrackingService, ticks: Option<u32>) -> Result<(), AppError> {
    let mut updates = tracking.tracker().subscribe();
    let view = tracking.refresh().await?;
    print_line(&tracker_line(&view))?;
    if view.status == TrackerStatus::Idle {
        return Ok(());
    }
    updates.mark_unchanged();

    let mut printed = 0_u32;
    loop {
        if ticks.is_some_and(|limit| printed >= limit) {
            break;
        }
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                print_line(&tracker_line(&view))?;
                printed += 1;
                if view.status == TrackerStatus::Idle {
                    break;
                }
            }
            _ = signal::ctrl_c() => break,
        }
    }

    tracking.tracker().stop().await;
    Ok(())
}

async fn read_password(args: &LoginArgs) -> Result<String, AppError> {
    let password = match args.password_file.as_ref() {
        Some(path) => fs::read_to_string(path)
            .await
            .map_err(|err| AppError::validation(format!("failed to read password file: {err}")))?
            .trim_end_matches(['\r', '\n'])
            .to_string(),
        None => args.password_env.clone().unwrap_or_default(),
    };

    if password.is_empty() {
        return Err(AppError::validation(
            "password required: use --password-file or set REYBEX_PASSWORD",
        ));
    }
    Ok(password)
}

fn parse_task_id(raw: &str) -> Result<EntityId, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("task id must not be empty"));
    }
    Ok(EntityId::new(trimmed))
}
