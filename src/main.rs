//! # SchoolHub: school records portal in the terminal
//!
//! Usage:
//!   schoolhub session set --user u1 --role admin --token <jwt>
//!   schoolhub activity list                  # timeline for the session role
//!   schoolhub course add --name Algebra      # 409 shows the server's message
//!   schoolhub student search                 # debounced, one query per line
//!   schoolhub serve --port 3000              # local gateway

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use schoolhub_client::SrsClient;
use schoolhub_client::grades::GradeView;
use schoolhub_client::schedule::ScheduleOwner;
use schoolhub_core::config::SchoolHubConfig;
use schoolhub_core::grading::AttendanceSummary;
use schoolhub_core::types::{AttendanceEntry, AttendanceRecord, ListQuery, Role, Student};
use schoolhub_core::{Session, SessionStore};
use schoolhub_portal::debounce::SearchController;
use schoolhub_portal::{
    ActivityFeed, CourseForm, DepartmentForm, LoadState, RoleNav, Section, ToastKind, ToastQueue,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "schoolhub",
    version,
    about = "🏫 SchoolHub: role-based school records portal"
)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: $SCHOOLHUB_CONFIG or ~/.schoolhub/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Signed-in identity used for every other command
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Activity timeline
    Activity {
        #[command(subcommand)]
        action: ActivityAction,
    },
    /// Courses
    Course {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// Departments
    Department {
        #[command(subcommand)]
        action: DepartmentAction,
    },
    /// Students
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },
    /// Teachers
    Teacher {
        #[command(subcommand)]
        action: TeacherAction,
    },
    /// Parents and guardians
    Parent {
        #[command(subcommand)]
        action: ParentAction,
    },
    /// Weekly timetable
    Schedule {
        /// Student id (defaults to the session's student)
        #[arg(long, conflicts_with = "teacher")]
        student: Option<String>,
        /// Teacher id (defaults to the session user for teachers)
        #[arg(long)]
        teacher: Option<String>,
    },
    /// Attendance
    Attendance {
        #[command(subcommand)]
        action: AttendanceAction,
    },
    /// Course grades with letter marks
    Grades {
        #[arg(long)]
        student: Option<String>,
        #[arg(long)]
        course: Option<String>,
    },
    /// Download a student's report cards as the backend serves them
    ReportCards {
        #[arg(long)]
        student: Option<String>,
        /// Output file
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Sections available to the session role
    Nav,
    /// Start the local gateway
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(long)]
        host: Option<String>,
    },
    /// Configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Store the signed-in identity
    Set {
        #[arg(long)]
        user: String,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        student: Option<String>,
        #[arg(long)]
        parent: Option<String>,
        /// Bearer token from the login page
        #[arg(long)]
        token: Option<String>,
    },
    Show,
    Clear,
}

#[derive(clap::Args)]
struct PageArgs {
    #[arg(long)]
    page: Option<u64>,
    #[arg(long)]
    limit: Option<u64>,
    #[arg(long)]
    search: Option<String>,
}

impl PageArgs {
    fn query(self, default_limit: u64) -> ListQuery {
        ListQuery {
            page: self.page,
            limit: self.limit.or(Some(default_limit)),
            search: self.search,
        }
    }
}

#[derive(Subcommand)]
enum ActivityAction {
    List {
        /// Actor role (Admin, Teacher, Student); defaults to the session role
        #[arg(long)]
        role: Option<Role>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum CourseAction {
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    Add {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        fields: CourseFields,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: CourseFields,
    },
    Delete { id: String },
}

#[derive(clap::Args)]
struct CourseFields {
    #[arg(long)]
    code: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    teacher: Option<String>,
    #[arg(long)]
    credits: Option<f64>,
}

impl CourseFields {
    fn apply(self, form: &mut CourseForm) {
        if let Some(v) = self.code {
            form.code = v;
        }
        if let Some(v) = self.description {
            form.description = v;
        }
        if let Some(v) = self.department {
            form.department_id = v;
        }
        if let Some(v) = self.teacher {
            form.teacher_id = v;
        }
        if self.credits.is_some() {
            form.credits = self.credits;
        }
    }
}

#[derive(Subcommand)]
enum DepartmentAction {
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand)]
enum StudentAction {
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    Show { id: String },
    /// Interactive search: type a query per line, results follow each pause
    Search,
}

#[derive(Subcommand)]
enum TeacherAction {
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
}

#[derive(Subcommand)]
enum ParentAction {
    /// Students linked to a parent (defaults to the session's parent)
    Children {
        #[arg(long)]
        parent: Option<String>,
    },
}

#[derive(Subcommand)]
enum AttendanceAction {
    /// Mark a course session: `s1:present s2:late s3:absent`
    Take {
        #[arg(long)]
        course: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(required = true, value_parser = parse_entry)]
        entries: Vec<AttendanceEntry>,
    },
    /// A student's record and effective percentage
    Student {
        id: Option<String>,
    },
    /// Marks of one course session
    Course {
        #[arg(long)]
        course: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    /// Write the default config file
    Init {
        #[arg(long)]
        force: bool,
    },
}

fn parse_entry(s: &str) -> std::result::Result<AttendanceEntry, String> {
    let (student_id, status) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <student>:<status>, got '{s}'"))?;
    Ok(AttendanceEntry {
        student_id: student_id.trim().to_string(),
        status: status.parse().map_err(|e| format!("{e}"))?,
    })
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn open_store(config: &SchoolHubConfig) -> Result<SessionStore> {
    let path = expand_path(&config.session.db_path);
    SessionStore::open(std::path::Path::new(&path))
        .with_context(|| format!("opening session store {path}"))
}

/// Current session, refusing sections the role's portal does not have.
fn require_session(config: &SchoolHubConfig, section: Section) -> Result<Session> {
    let Some(session) = open_store(config)?.load()? else {
        bail!("no session; run `schoolhub session set --user <id> --role <role>` first");
    };
    session.role().require(section)?;
    Ok(session)
}

fn client_for(config: &SchoolHubConfig, session: Session) -> Result<SrsClient> {
    Ok(schoolhub_client::create_client(config, Some(session))?)
}

fn print_toasts(toasts: &mut ToastQueue) {
    for toast in toasts.drain() {
        let icon = match toast.kind {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
        };
        println!("{icon} {}", toast.message);
    }
}

fn print_students(students: &[Student]) {
    for s in students {
        println!(
            "  {:<12} {:<28} {}",
            s.id,
            s.full_name(),
            s.grade_level.as_deref().unwrap_or("-")
        );
    }
}

fn print_attendance(records: &[AttendanceRecord]) {
    for r in records {
        println!("  {}  {:<12} {:?}", r.date, r.student_id, r.status);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "schoolhub=debug,tower_http=debug"
    } else {
        "schoolhub=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let mut config = SchoolHubConfig::load_from(path)
                .with_context(|| format!("loading {}", path.display()))?;
            config.apply_env_overrides();
            config
        }
        None => SchoolHubConfig::load()?,
    };
    tracing::debug!(backend = %config.backend.srs_server, "configuration loaded");

    match cli.command {
        Commands::Session { action } => session_command(&config, action),
        Commands::Activity { action } => activity_command(&config, action).await,
        Commands::Course { action } => course_command(&config, action).await,
        Commands::Department { action } => department_command(&config, action).await,
        Commands::Student { action } => student_command(&config, action).await,
        Commands::Teacher {
            action: TeacherAction::List { paging },
        } => {
            let session = require_session(&config, Section::Teachers)?;
            let client = client_for(&config, session)?;
            let page = client
                .list_teachers(&paging.query(config.portal.page_limit))
                .await?;
            for t in &page.data {
                println!("  {:<12} {:<28} {}", t.id, t.full_name(), t.email.as_deref().unwrap_or("-"));
            }
            println!("Page {}/{} · {} teachers", page.current_page, page.total_pages, page.total_records);
            Ok(())
        }
        Commands::Parent {
            action: ParentAction::Children { parent },
        } => {
            let session = require_session(&config, Section::Children)?;
            let parent_id = match parent.as_deref().or(session.parent_id()) {
                Some(id) => id.to_string(),
                None => session.user_id().to_string(),
            };
            let client = client_for(&config, session)?;
            let children = client.children(&parent_id).await?;
            if children.is_empty() {
                println!("No students linked to parent {parent_id}.");
            }
            print_students(&children);
            Ok(())
        }
        Commands::Schedule { student, teacher } => {
            let session = require_session(&config, Section::Schedule)?;
            let owner = match (student, teacher) {
                (Some(id), _) => ScheduleOwner::Student(id),
                (None, Some(id)) => ScheduleOwner::Teacher(id),
                (None, None) if session.role() == Role::Teacher => {
                    ScheduleOwner::Teacher(session.user_id().to_string())
                }
                (None, None) => ScheduleOwner::Student(session.require_student_id()?.to_string()),
            };
            let client = client_for(&config, session)?;
            let items = client.schedule(&owner).await?;
            if items.is_empty() {
                println!("Nothing scheduled.");
            }
            for item in &items {
                println!(
                    "  {:<10} {}-{}  {:<24} {}",
                    item.day,
                    item.start_time,
                    item.end_time,
                    item.course_name.as_deref().unwrap_or(&item.course_id),
                    item.room.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
        Commands::Attendance { action } => attendance_command(&config, action).await,
        Commands::Grades { student, course } => {
            let session = require_session(&config, Section::Grades)?;
            let student_id = match student {
                Some(id) => id,
                None => session.require_student_id()?.to_string(),
            };
            let client = client_for(&config, session)?;
            let grades = client
                .student_course_grades(&student_id, course.as_deref())
                .await?;
            for view in grades.iter().map(GradeView::from) {
                let pct = view
                    .percentage
                    .map(|p| format!("{p:.1}%"))
                    .unwrap_or_else(|| "-".into());
                println!(
                    "  {:<28} {:>7}  {}",
                    view.course_name.as_deref().unwrap_or(&view.course_id),
                    pct,
                    view.letter.unwrap_or("-")
                );
            }
            Ok(())
        }
        Commands::ReportCards { student, out } => {
            let session = require_session(&config, Section::ReportCards)?;
            let student_id = match student {
                Some(id) => id,
                None => session.require_student_id()?.to_string(),
            };
            let client = client_for(&config, session)?;
            let resp = client.report_cards(&student_id).await?;
            if !(200..300).contains(&resp.status) {
                bail!(
                    "backend answered {}: {}",
                    resp.status,
                    String::from_utf8_lossy(&resp.body)
                );
            }
            std::fs::write(&out, &resp.body)?;
            println!("✅ Report cards saved to {} ({} bytes)", out.display(), resp.body.len());
            Ok(())
        }
        Commands::Nav => {
            let session = open_store(&config)?
                .load()?
                .context("no session; run `schoolhub session set` first")?;
            let role = session.role();
            println!("🏫 {role} portal ({})", role.home_path());
            for section in role.sections() {
                println!("  {:<14} {}", section.label(), role.path_of(*section).unwrap_or_default());
            }
            Ok(())
        }
        Commands::Serve { port, host } => {
            let mut config = config;
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(host) = host {
                config.gateway.host = host;
            }
            println!("🏫 SchoolHub gateway v{}", env!("CARGO_PKG_VERSION"));
            println!("   Backend: {}", config.backend.srs_server);
            println!("   Listen:  http://{}:{}", config.gateway.host, config.gateway.port);
            schoolhub_gateway::start(config).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigAction::Init { force } => {
                let path = cli.config.clone().unwrap_or_else(|| {
                    std::env::var("SCHOOLHUB_CONFIG")
                        .map(PathBuf::from)
                        .unwrap_or_else(|_| SchoolHubConfig::default_path())
                });
                if path.exists() && !force {
                    bail!("{} already exists (use --force to overwrite)", path.display());
                }
                SchoolHubConfig::default().save_to(&path)?;
                println!("✅ Config written to {}", path.display());
                Ok(())
            }
        },
    }
}

fn session_command(config: &SchoolHubConfig, action: SessionAction) -> Result<()> {
    let store = open_store(config)?;
    match action {
        SessionAction::Set {
            user,
            role,
            student,
            parent,
            token,
        } => {
            let mut session = Session::new(user, role);
            if let Some(id) = student {
                session = session.with_student_id(id);
            }
            if let Some(id) = parent {
                session = session.with_parent_id(id);
            }
            if let Some(token) = token {
                session = session.with_token(token);
            }
            store.save(&session)?;
            println!("✅ Signed in as {} ({role}) → {}", session.user_id(), role.home_path());
        }
        SessionAction::Show => match store.load()? {
            Some(s) => {
                println!("User:    {}", s.user_id());
                println!("Role:    {}", s.role());
                println!("Student: {}", s.student_id().unwrap_or("-"));
                println!("Parent:  {}", s.parent_id().unwrap_or("-"));
                println!("Token:   {}", if s.bearer().is_some() { "set" } else { "none" });
            }
            None => println!("No session."),
        },
        SessionAction::Clear => {
            store.clear()?;
            println!("Session cleared.");
        }
    }
    Ok(())
}

async fn activity_command(config: &SchoolHubConfig, action: ActivityAction) -> Result<()> {
    let session = require_session(config, Section::Activity)?;
    let default_role = session.role();
    let client = Arc::new(client_for(config, session)?);
    let mut feed = ActivityFeed::new(client).with_toast_capacity(config.portal.toast_history);

    let result = match action {
        ActivityAction::List { role, paging } => {
            let role = role.unwrap_or(default_role);
            let result = feed.fetch(role, &paging.query(config.portal.page_limit)).await;
            match feed.state() {
                LoadState::Data(items) => {
                    for a in items {
                        println!("  {:<10} {:<32} {:<20} {}", a.id, a.title, a.subtitle, a.relative_time);
                    }
                    if let Some(page) = feed.page() {
                        println!(
                            "Page {}/{} · {} records",
                            page.current_page, page.total_pages, page.total_records
                        );
                    }
                }
                LoadState::Empty => println!("No activity yet."),
                LoadState::Loading | LoadState::Error(_) => {}
            }
            result
        }
        ActivityAction::Delete { id } => feed.delete(&id).await,
    };
    print_toasts(feed.toasts_mut());
    Ok(result?)
}

async fn course_command(config: &SchoolHubConfig, action: CourseAction) -> Result<()> {
    let session = require_session(config, Section::Courses)?;
    let client = client_for(config, session)?;
    match action {
        CourseAction::List { paging } => {
            let page = client.list_courses(&paging.query(config.portal.page_limit)).await?;
            for c in &page.data {
                println!("  {:<12} {:<10} {}", c.id, c.code.as_deref().unwrap_or("-"), c.name);
            }
            println!("Page {}/{} · {} courses", page.current_page, page.total_pages, page.total_records);
        }
        CourseAction::Add { name, fields } => {
            let mut form = CourseForm::new();
            form.name = name;
            fields.apply(&mut form);
            submit_course(&client, form).await?;
        }
        CourseAction::Edit { id, name, fields } => {
            let course = client.get_course(&id).await?;
            let mut form = CourseForm::edit(&course);
            if let Some(name) = name {
                form.name = name;
            }
            fields.apply(&mut form);
            submit_course(&client, form).await?;
        }
        CourseAction::Delete { id } => {
            client.delete_course(&id).await?;
            println!("✅ Course {id} deleted");
        }
    }
    Ok(())
}

async fn submit_course(client: &SrsClient, mut form: CourseForm) -> Result<()> {
    let editing = form.is_edit();
    match form.submit(client).await {
        Ok(course) => {
            let verb = if editing { "updated" } else { "added" };
            println!("✅ Course {} {verb} ({})", course.name, course.id);
            Ok(())
        }
        Err(e) => {
            println!("❌ {}", form.error().unwrap_or_default());
            Err(e.into())
        }
    }
}

async fn department_command(config: &SchoolHubConfig, action: DepartmentAction) -> Result<()> {
    let session = require_session(config, Section::Departments)?;
    let client = client_for(config, session)?;
    match action {
        DepartmentAction::List { paging } => {
            let page = client
                .list_departments(&paging.query(config.portal.page_limit))
                .await?;
            for d in &page.data {
                println!("  {:<12} {:<24} {}", d.id, d.name, d.description.as_deref().unwrap_or(""));
            }
            println!("Page {}/{} · {} departments", page.current_page, page.total_pages, page.total_records);
        }
        DepartmentAction::Add { name, description } => {
            let mut form = DepartmentForm::new();
            form.name = name;
            form.description = description.unwrap_or_default();
            match form.submit(&client).await {
                Ok(d) => println!("✅ Department {} added ({})", d.name, d.id),
                Err(e) => {
                    println!("❌ {}", form.error().unwrap_or_default());
                    return Err(e.into());
                }
            }
        }
        DepartmentAction::Delete { id } => {
            client.delete_department(&id).await?;
            println!("✅ Department {id} deleted");
        }
    }
    Ok(())
}

async fn student_command(config: &SchoolHubConfig, action: StudentAction) -> Result<()> {
    let session = require_session(config, Section::Students)?;
    let client = client_for(config, session)?;
    match action {
        StudentAction::List { paging } => {
            let page = client.list_students(&paging.query(config.portal.page_limit)).await?;
            print_students(&page.data);
            println!("Page {}/{} · {} students", page.current_page, page.total_pages, page.total_records);
        }
        StudentAction::Show { id } => {
            let s = client.get_student(&id).await?;
            println!("{}", serde_json::to_string_pretty(&s)?);
        }
        StudentAction::Search => search_students(config, client).await?,
    }
    Ok(())
}

/// Read queries from stdin and print results once typing pauses.
async fn search_students(config: &SchoolHubConfig, client: SrsClient) -> Result<()> {
    let quiet = Duration::from_millis(config.portal.search_debounce_ms);
    let search = SearchController::new(Arc::new(client), quiet, Some(config.portal.page_limit));
    let mut results = search.subscribe();
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut pending = false;

    println!("🔎 Type to search students (Ctrl-D to quit)");
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    search.input(line);
                    pending = true;
                }
                None => break,
            },
            changed = results.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = results.borrow_and_update().clone();
                if render_search(&state) {
                    pending = false;
                }
            }
        }
    }

    // Input closed mid-pause: wait for the last query to settle.
    if pending {
        let wait = quiet + Duration::from_secs(config.backend.timeout_secs);
        let _ = tokio::time::timeout(wait, async {
            while results.changed().await.is_ok() {
                let state = results.borrow_and_update().clone();
                if render_search(&state) {
                    break;
                }
            }
        })
        .await;
    }
    Ok(())
}

/// Print a search state; true once a final (non-loading) state was shown.
fn render_search(state: &LoadState<Vec<Student>>) -> bool {
    match state {
        LoadState::Loading => false,
        LoadState::Empty => {
            println!("  (no matches)");
            true
        }
        LoadState::Error(msg) => {
            println!("❌ {msg}");
            true
        }
        LoadState::Data(students) => {
            print_students(students);
            true
        }
    }
}

async fn attendance_command(config: &SchoolHubConfig, action: AttendanceAction) -> Result<()> {
    let session = require_session(config, Section::Attendance)?;
    match action {
        AttendanceAction::Take {
            course,
            date,
            entries,
        } => {
            if session.role() != Role::Teacher {
                bail!("only teachers take attendance");
            }
            let date = date.unwrap_or_else(today);
            let summary = AttendanceSummary::from_statuses(entries.iter().map(|e| e.status));
            let client = client_for(config, session)?;
            client.take_attendance(&course, date, entries).await?;
            println!(
                "✅ Attendance saved for {course} on {date}: {} present, {} late, {} absent",
                summary.present, summary.late, summary.absent
            );
        }
        AttendanceAction::Student { id } => {
            let student_id = match id {
                Some(id) => id,
                None => session.require_student_id()?.to_string(),
            };
            let client = client_for(config, session)?;
            let (records, summary) = client.attendance_summary(&student_id).await?;
            print_attendance(&records);
            println!(
                "Effective attendance: {:.1}% ({} present, {} late, {} absent)",
                summary.effective_percentage(),
                summary.present,
                summary.late,
                summary.absent
            );
        }
        AttendanceAction::Course { course, date } => {
            let date = date.unwrap_or_else(today);
            let client = client_for(config, session)?;
            let records = client.course_attendance(&course, date).await?;
            if records.is_empty() {
                println!("No attendance recorded for {course} on {date}.");
            }
            print_attendance(&records);
        }
    }
    Ok(())
}
