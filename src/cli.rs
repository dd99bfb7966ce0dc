use std::fmt::Display;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use serde_json::Value;
use terminal_size::{terminal_size, Width};
use tokio::io::{AsyncBufReadExt, BufReader};
use yansi::Paint;

use labdash::api::{self, ApiClient, ApiError, NewDeployment, NewPod, ResourceSpec};
use labdash::config;
use labdash::models::{
    ContainerInstance, ContainerTemplate, ContainerTemplatePayload, CurrentUser, ImageTemplate, ImageTemplatePayload,
    NewContainer, NewUser, Role, SshConnection, User, UserUpdate,
};
use labdash::poll::Poller;
use labdash::services::{container_action, load_dashboard, ContainerAction, DashboardData};
use labdash::session::FileSessionStore;
use labdash::utils::parse_labels;

/// What every API command needs: a client bound to the session file.
pub struct CliContext {
    pub api: ApiClient,
    pub session: Arc<FileSessionStore>,
    pub refresh_interval: Duration,
}

impl CliContext {
    pub fn load(client: reqwest::Client) -> Self {
        let path = config::get_session_file();
        let session = match FileSessionStore::open(&path) {
            Ok(s) => Arc::new(s),
            Err(e) => fail(format!("Failed to open session file: {}", e)),
        };
        let api = ApiClient::new(client, config::get_api_base_url(), session.clone());
        Self {
            api,
            session,
            refresh_interval: config::get_refresh_interval(),
        }
    }

    /// The signed-in user; exits when there is no usable session.
    fn require_user(&self) -> CurrentUser {
        match self.session.current().filter(|u| u.has_token()) {
            Some(u) => u.to_current_user(),
            None => fail("Not logged in. Run `labdash login <username>` first."),
        }
    }
}

pub fn fail(message: impl Display) -> ! {
    eprintln!("{}", Paint::new(message.to_string()).red());
    process::exit(1);
}

fn api_failure(what: &str, e: &ApiError) -> ! {
    if e.is_unauthorized() {
        fail(format!("{}: session expired or invalid. Run `labdash login` again.", what));
    }
    fail(format!("{}: {}", what, e));
}

/// Prints the outcome of a mutating call, or exits non-zero.
fn finish(result: Result<Value, ApiError>, success: &str, failure: &str) {
    match result {
        Ok(value) => {
            println!("{}", Paint::new(success).green());
            if !value.is_null() && value != Value::String(String::new()) {
                print_api_response(&value);
            }
        }
        Err(e) => api_failure(failure, &e),
    }
}

fn unwrap_list<T>(what: &str, result: Result<Vec<T>, ApiError>) -> Vec<T> {
    match result {
        Ok(v) => v,
        Err(e) => api_failure(&format!("Failed to load {}", what), &e),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn print_rows(empty: &str, headers: Vec<&str>, rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        println!("{}", Paint::new(empty).dim());
        return;
    }
    let mut table = new_table();
    table.set_header(headers);
    for row in rows {
        table.add_row(row);
    }
    println!("\n{table}\n");
}

fn json_value_to_string(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(v).unwrap_or_default(),
    }
}

fn print_table(value: &Value) {
    let mut table = new_table();
    match value {
        Value::Array(arr) => {
            if arr.is_empty() {
                println!("(empty list)");
                return;
            }
            if let Some(first) = arr.iter().find_map(|v| v.as_object()) {
                let headers: Vec<&String> = first.keys().collect();
                table.set_header(&headers);
                for item in arr {
                    if let Some(obj) = item.as_object() {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|k| obj.get(*k).map(json_value_to_string).unwrap_or_default())
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![json_value_to_string(item)]);
                }
            }
        }
        Value::Object(obj) => {
            table.set_header(vec!["Field", "Value"]);
            for (k, v) in obj {
                table.add_row(vec![k.clone(), json_value_to_string(v)]);
            }
        }
        _ => {
            println!("{}", json_value_to_string(value));
            return;
        }
    }
    println!("\n{table}\n");
}

/// Prints a response body, unwrapping a `{"message", "data"}` envelope.
fn print_api_response(value: &Value) {
    if let Some(obj) = value.as_object() {
        if let Some(data) = obj.get("data") {
            if let Some(message) = obj.get("message").and_then(|v| v.as_str()) {
                println!("{}", message);
            }
            print_table(data);
            return;
        }
    }
    print_table(value);
}

fn container_rows(containers: &[ContainerInstance], with_owner: bool) -> (Vec<&'static str>, Vec<Vec<String>>) {
    let mut headers = vec!["ID", "Name", "Status"];
    if with_owner {
        headers.push("Owner");
    }
    headers.extend(["Template", "Pod", "Created"]);
    let rows = containers
        .iter()
        .map(|c| {
            let mut row = vec![c.id.clone(), c.name.clone(), c.status.label().to_string()];
            if with_owner {
                row.push(c.owner_display().to_string());
            }
            row.push(c.template_display().to_string());
            row.push(c.pod_display().to_string());
            row.push(c.created_display());
            row
        })
        .collect();
    (headers, rows)
}

fn print_containers(containers: &[ContainerInstance], with_owner: bool) {
    let (headers, rows) = container_rows(containers, with_owner);
    print_rows("No containers.", headers, rows);
}

fn print_templates(templates: &[ContainerTemplate]) {
    let rows = templates
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.name.clone(),
                t.docker_image.clone(),
                t.category.clone().unwrap_or_default(),
                t.resources_display(),
                if t.ssh_enabled { "yes".into() } else { "no".into() },
                t.owner_display().to_string(),
            ]
        })
        .collect();
    print_rows(
        "No templates found.",
        vec!["ID", "Name", "Image", "Category", "Resources", "SSH", "Owner"],
        rows,
    );
}

fn print_images(images: &[ImageTemplate]) {
    let rows = images
        .iter()
        .map(|i| {
            vec![
                i.id.clone(),
                i.name.clone(),
                i.docker_image.clone(),
                i.technology_display(),
                if i.built { "built".into() } else { "pending".into() },
            ]
        })
        .collect();
    print_rows("No images.", vec!["ID", "Name", "Image", "Technology", "Built"], rows);
}

fn print_connections(connections: &[SshConnection]) {
    let rows = connections
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                if c.container_name.is_empty() {
                    c.container_id.clone()
                } else {
                    c.container_name.clone()
                },
                c.command(),
                c.status_label().to_string(),
                c.expires_display(),
            ]
        })
        .collect();
    print_rows(
        "No SSH connections.",
        vec!["ID", "Container", "Command", "Status", "Expires"],
        rows,
    );
}

fn print_users(users: &[User]) {
    let rows = users
        .iter()
        .map(|u| {
            vec![
                u.id.clone(),
                u.username.clone(),
                u.email_display().to_string(),
                u.role().label().to_string(),
                u.namespace_display().to_string(),
                if u.is_active() { "active".into() } else { "inactive".into() },
            ]
        })
        .collect();
    print_rows(
        "No users.",
        vec!["ID", "Username", "Email", "Role", "Namespace", "Status"],
        rows,
    );
}

fn print_dashboard(data: &DashboardData, user: &CurrentUser) {
    println!(
        "{} {} ({})",
        Paint::new("Dashboard for").bold(),
        user.username,
        user.role.label()
    );
    if let Some(e) = &data.error {
        eprintln!("{}", Paint::new(e).red());
    }
    let s = &data.stats;
    if user.is_staff() {
        println!(
            "Pods: {}/{} running | Containers: {}/{} running | Users: {}/{} active | Templates: {}",
            s.running_pods,
            s.total_pods,
            s.active_containers,
            s.total_containers,
            s.active_users,
            s.total_users,
            s.templates
        );
        let status = data
            .system
            .entries()
            .into_iter()
            .map(|(name, value, _)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("System: {}", status);
    } else {
        println!("Containers: {}/{} running", s.active_containers, s.total_containers);
    }
    print_containers(&data.containers, user.is_staff());
    if !data.activities.is_empty() {
        println!("{}", Paint::new("Recent activity").bold());
        for a in &data.activities {
            println!("  {}  {}", Paint::new(a.when()).dim(), a.message);
        }
        println!();
    }
}

async fn prompt_password() -> String {
    eprint!("Password: ");
    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    if let Err(e) = reader.read_line(&mut line).await {
        fail(format!("Failed to read password: {}", e));
    }
    line.trim_end_matches(['\r', '\n']).to_string()
}

pub async fn login(ctx: &CliContext, username: String, password: Option<String>) {
    let password = match password {
        Some(p) => p,
        None => prompt_password().await,
    };
    if username.trim().is_empty() || password.is_empty() {
        fail("Username and password are required");
    }
    match api::login(&ctx.api.without_session(), &username, &password).await {
        Ok(resp) => {
            let user = resp.into_stored_user(&username);
            let role = user.role();
            if let Err(e) = ctx.session.save(user.clone()) {
                fail(format!("Failed to save session: {}", e));
            }
            tracing::info!(username = %user.username, role = %role, "Login successful");
            println!(
                "{} {} ({})",
                Paint::new("Logged in as").green(),
                user.username,
                role.label()
            );
        }
        Err(ApiError::Unauthorized) => fail("Invalid username or password"),
        Err(e) => fail(format!("Login failed: {}", e)),
    }
}

pub fn logout(ctx: &CliContext) {
    match ctx.session.clear_session() {
        Ok(()) => println!("{}", Paint::new("Logged out").green()),
        Err(e) => fail(format!("Failed to clear session: {}", e)),
    }
}

pub async fn whoami(ctx: &CliContext, remote: bool) {
    let user = ctx.require_user();
    println!("{} ({})", user.username, user.role.label());
    if remote {
        match api::users::current_user(&ctx.api).await {
            Ok(u) => print_users(&[u]),
            Err(e) => api_failure("Failed to load profile", &e),
        }
    }
}

/// Validates the base URL and, when signed in, that the stored token is
/// still accepted. A rejected token is reported but not cleared.
pub async fn check_config(ctx: &CliContext) {
    let base = ctx.api.base_url().to_string();
    println!("API_BASE_URL          {}", base);
    println!("SESSION_FILE          {}", ctx.session.path().display());
    println!("REFRESH_INTERVAL_SECS {}", ctx.refresh_interval.as_secs());
    if let Err(e) = reqwest::Url::parse(&base) {
        fail(format!("API_BASE_URL is not a valid URL: {}", e));
    }
    let Some(user) = ctx.session.current().filter(|u| u.has_token()) else {
        println!("{}", Paint::new("Not logged in; skipping token check").yellow());
        return;
    };
    match ctx.api.request_with_token(&user.token, "GET", "/users/me", None).await {
        Ok(_) => println!(
            "{} {}",
            Paint::new("Configuration looks valid; token accepted for").green(),
            user.username
        ),
        Err(e) => fail(format!("Configuration appears invalid: {}", e)),
    }
}

pub async fn dashboard(ctx: &CliContext, watch: bool) {
    let user = ctx.require_user();
    match load_dashboard(&ctx.api, &user).await {
        Ok(data) => print_dashboard(&data, &user),
        Err(e) => api_failure("Failed to load dashboard", &e),
    }
    if !watch {
        return;
    }

    println!(
        "{}",
        Paint::new(format!(
            "Refreshing every {}s, press Ctrl-C to stop",
            ctx.refresh_interval.as_secs()
        ))
        .dim()
    );
    let api = ctx.api.clone();
    let poller = Poller::spawn(ctx.refresh_interval, move || {
        let api = api.clone();
        let user = user.clone();
        async move {
            match load_dashboard(&api, &user).await {
                Ok(data) => print_dashboard(&data, &user),
                Err(e) => eprintln!("{}", Paint::new(format!("Refresh failed: {}", e)).red()),
            }
        }
    });
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(%e, "Failed to listen for Ctrl-C");
    }
    poller.stop();
}

#[derive(Subcommand)]
pub enum ContainerCommands {
    #[command(about = "List all containers (staff)")]
    List,
    #[command(about = "List your own containers")]
    Mine,
    #[command(
        about = "Create a container from a template",
        long_about = "Create a container from a container template. Staff may pass --student to create it on a student's behalf."
    )]
    Create {
        template_id: String,
        #[arg(long)]
        student: Option<String>,
    },
    Start { id: String },
    Stop { id: String },
    Restart { id: String },
    #[command(about = "Delete a container and its pod")]
    Delete { id: String },
    #[command(about = "Show the SSH command for a container")]
    SshInfo { id: String },
    #[command(about = "Print a container's logs")]
    Logs { id: String },
    #[command(about = "Ask the backend to re-read container statuses from Kubernetes")]
    Refresh,
}

pub async fn containers(ctx: &CliContext, sub: ContainerCommands) {
    let api = &ctx.api;
    match sub {
        ContainerCommands::List => print_containers(&unwrap_list("containers", api::containers::list_containers(api).await), true),
        ContainerCommands::Mine => {
            print_containers(&unwrap_list("containers", api::containers::list_my_containers(api).await), false)
        }
        ContainerCommands::Create { template_id, student } => {
            let request = NewContainer {
                template_id,
                student_id: student.filter(|s| !s.trim().is_empty()),
            };
            finish(
                api::containers::create_container(api, &request).await,
                "Container created successfully!",
                "Failed to create container",
            );
        }
        ContainerCommands::Start { id } => run_action(api, ContainerAction::Start, &id).await,
        ContainerCommands::Stop { id } => run_action(api, ContainerAction::Stop, &id).await,
        ContainerCommands::Restart { id } => run_action(api, ContainerAction::Restart, &id).await,
        ContainerCommands::Delete { id } => run_action(api, ContainerAction::Delete, &id).await,
        ContainerCommands::SshInfo { id } => match api::containers::container_ssh_info(api, &id).await {
            Ok(info) => {
                if info.ready {
                    println!("{}", Paint::new(info.command()).cyan());
                    if let Some(p) = info.password.as_deref().filter(|p| !p.is_empty()) {
                        println!("Password: {}", p);
                    }
                } else {
                    println!("{}", Paint::new("SSH is not ready yet").yellow());
                }
                if let Some(m) = info.message.as_deref().or(info.note.as_deref()) {
                    println!("{}", Paint::new(m).dim());
                }
            }
            Err(e) => api_failure("Failed to load SSH information", &e),
        },
        ContainerCommands::Logs { id } => match api::containers::container_logs(api, &id).await {
            Ok(logs) => println!("{}", logs),
            Err(e) => api_failure("Failed to load logs", &e),
        },
        ContainerCommands::Refresh => {
            api::containers::refresh_container_statuses(api).await;
            println!("{}", Paint::new("Status refresh requested").green());
        }
    }
}

async fn run_action(api: &ApiClient, action: ContainerAction, id: &str) {
    let success = format!("Container {} successfully", action.past_tense());
    let failure = format!("Failed to {} container", action.verb());
    finish(container_action(api, action, id).await, &success, &failure);
}

#[derive(Args)]
pub struct TemplateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    image: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value = "")]
    cpu_limit: String,
    #[arg(long, default_value = "")]
    memory_limit: String,
    #[arg(long, default_value = "")]
    cpu_request: String,
    #[arg(long, default_value = "")]
    memory_request: String,
    #[arg(long)]
    ssh: bool,
    #[arg(long)]
    shared: bool,
    #[arg(long)]
    persistent_storage: bool,
    #[arg(long, default_value = "")]
    storage_size: String,
    /// KEY=VALUE, repeatable
    #[arg(long = "env")]
    env: Vec<String>,
    #[arg(long, default_value = "")]
    command: String,
    /// Repeatable
    #[arg(long = "arg")]
    args: Vec<String>,
}

impl From<TemplateArgs> for ContainerTemplatePayload {
    fn from(a: TemplateArgs) -> Self {
        Self {
            name: a.name,
            description: a.description,
            docker_image: a.image,
            category: a.category,
            cpu_limit: a.cpu_limit,
            memory_limit: a.memory_limit,
            cpu_request: a.cpu_request,
            memory_request: a.memory_request,
            ssh_enabled: a.ssh,
            persistent_storage: a.persistent_storage,
            storage_size: a.storage_size,
            shared: a.shared,
            environment_vars: a.env,
            command: a.command,
            args: a.args,
        }
    }
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    #[command(about = "List every visible container template")]
    List,
    #[command(about = "List templates you created")]
    Mine,
    #[command(about = "List templates with SSH enabled")]
    Ssh,
    #[command(about = "List the built-in example templates")]
    Examples,
    Search { name: String },
    Category { category: String },
    #[command(about = "Create a container template")]
    Create(TemplateArgs),
    #[command(about = "Replace a container template")]
    Update {
        id: String,
        #[command(flatten)]
        template: TemplateArgs,
    },
    Delete { id: String },
}

pub async fn templates(ctx: &CliContext, sub: TemplateCommands) {
    use api::container_templates as ct;
    let api = &ctx.api;
    let listed = match sub {
        TemplateCommands::List => ct::list_templates(api).await,
        TemplateCommands::Mine => ct::list_my_templates(api).await,
        TemplateCommands::Ssh => ct::list_ssh_enabled_templates(api).await,
        TemplateCommands::Examples => ct::list_example_templates(api).await,
        TemplateCommands::Search { name } => ct::search_templates(api, &name).await,
        TemplateCommands::Category { category } => ct::list_templates_by_category(api, &category).await,
        TemplateCommands::Create(args) => {
            let payload = ContainerTemplatePayload::from(args);
            if let Err(m) = payload.validate() {
                fail(m);
            }
            return finish(
                ct::create_template(api, &payload).await,
                "Template created successfully",
                "Failed to create template",
            );
        }
        TemplateCommands::Update { id, template } => {
            let payload = ContainerTemplatePayload::from(template);
            if let Err(m) = payload.validate() {
                fail(m);
            }
            return finish(
                ct::update_template(api, &id, &payload).await,
                "Template updated successfully",
                "Failed to update template",
            );
        }
        TemplateCommands::Delete { id } => {
            return finish(
                ct::delete_template(api, &id).await,
                "Template deleted successfully",
                "Failed to delete template",
            );
        }
    };
    print_templates(&unwrap_list("templates", listed));
}

#[derive(Args)]
pub struct ImageArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    image: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    technology: String,
    #[arg(long, default_value = "")]
    version: String,
}

impl From<ImageArgs> for ImageTemplatePayload {
    fn from(a: ImageArgs) -> Self {
        Self {
            name: a.name,
            docker_image: a.image,
            description: a.description,
            technology: a.technology,
            version: a.version,
        }
    }
}

#[derive(Subcommand)]
pub enum ImageCommands {
    List {
        #[arg(long)]
        technology: Option<String>,
    },
    #[command(about = "List images that are built and ready to use")]
    Available,
    #[command(about = "List builder technologies and their supported versions")]
    Technologies,
    Create(ImageArgs),
    Update {
        id: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    Delete { id: String },
    #[command(about = "Trigger an image build")]
    Build { id: String },
}

pub async fn images(ctx: &CliContext, sub: ImageCommands) {
    let api = &ctx.api;
    match sub {
        ImageCommands::List { technology } => {
            let mut images = unwrap_list("images", api::images::list_images(api).await);
            if let Some(tech) = technology.filter(|t| !t.trim().is_empty()) {
                images.retain(|i| i.technology.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(tech.trim())));
            }
            print_images(&images);
        }
        ImageCommands::Available => print_images(&unwrap_list("images", api::images::list_available_images(api).await)),
        ImageCommands::Technologies => {
            let (technologies, versions) = tokio::join!(
                api::images::list_technologies(api),
                api::images::list_technology_versions(api),
            );
            let versions = match versions {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(%e, "Failed to load technology versions");
                    Vec::new()
                }
            };
            for tech in unwrap_list("technologies", technologies) {
                match versions.iter().find(|(name, _)| name.eq_ignore_ascii_case(&tech)) {
                    Some((_, v)) if !v.is_empty() => println!("{} ({})", tech, v.join(", ")),
                    _ => println!("{}", tech),
                }
            }
        }
        ImageCommands::Create(args) => {
            let payload = ImageTemplatePayload::from(args);
            if let Err(m) = payload.validate() {
                fail(m);
            }
            finish(
                api::images::create_image(api, &payload).await,
                "Image created successfully",
                "Failed to create image",
            );
        }
        ImageCommands::Update { id, image } => {
            let payload = ImageTemplatePayload::from(image);
            if let Err(m) = payload.validate() {
                fail(m);
            }
            finish(
                api::images::update_image(api, &id, &payload).await,
                "Image updated successfully",
                "Failed to update image",
            );
        }
        ImageCommands::Delete { id } => finish(
            api::images::delete_image(api, &id).await,
            "Image deleted successfully",
            "Failed to delete image",
        ),
        ImageCommands::Build { id } => finish(
            api::images::build_image(api, &id).await,
            "Image build started",
            "Failed to build image",
        ),
    }
}

#[derive(Subcommand)]
pub enum SshCommands {
    #[command(about = "Open an SSH connection to a container and print the command")]
    Connect { container_id: String },
    List,
    Show { id: String },
    Revoke { id: String },
}

pub async fn ssh(ctx: &CliContext, sub: SshCommands) {
    let api = &ctx.api;
    match sub {
        SshCommands::Connect { container_id } => match api::ssh::create_ssh_connection(api, &container_id).await {
            Ok(conn) => {
                println!("{}", Paint::new(conn.command()).cyan());
                if let Some(p) = conn.password.as_deref().filter(|p| !p.is_empty()) {
                    println!("Password: {}", p);
                }
                println!("Expires: {}", conn.expires_display());
            }
            Err(e) => api_failure("Failed to create SSH connection", &e),
        },
        SshCommands::List => print_connections(&unwrap_list("SSH connections", api::ssh::list_ssh_connections(api).await)),
        SshCommands::Show { id } => match api::ssh::get_ssh_connection(api, &id).await {
            Ok(conn) => print_connections(&[conn]),
            Err(e) => api_failure("Failed to load SSH connection", &e),
        },
        SshCommands::Revoke { id } => finish(
            api::ssh::revoke_ssh_connection(api, &id).await,
            "SSH connection revoked",
            "Failed to revoke SSH connection",
        ),
    }
}

#[derive(Args)]
pub struct ResourceArgs {
    #[arg(long, default_value = "")]
    cpu_limit: String,
    #[arg(long, default_value = "")]
    memory_limit: String,
    #[arg(long, default_value = "")]
    cpu_request: String,
    #[arg(long, default_value = "")]
    memory_request: String,
}

impl From<ResourceArgs> for ResourceSpec {
    fn from(a: ResourceArgs) -> Self {
        Self {
            cpu_limit: a.cpu_limit,
            memory_limit: a.memory_limit,
            cpu_request: a.cpu_request,
            memory_request: a.memory_request,
        }
    }
}

#[derive(Subcommand)]
pub enum K8sCommands {
    Namespaces,
    CreateNamespace {
        name: String,
        /// key=value,key2=value2
        #[arg(long, default_value = "")]
        labels: String,
    },
    #[command(about = "Delete a namespace and everything in it")]
    DeleteNamespace { name: String },
    #[command(about = "List pods in one namespace, or across all namespaces with --all")]
    Pods {
        #[arg(long, short = 'n')]
        namespace: Option<String>,
        #[arg(long)]
        all: bool,
    },
    Pod { namespace: String, name: String },
    CreatePod {
        namespace: String,
        name: String,
        image: String,
        #[arg(long, default_value = "")]
        labels: String,
        #[command(flatten)]
        resources: ResourceArgs,
    },
    DeletePod { namespace: String, name: String },
    #[command(about = "Change a pod's CPU and memory requests/limits")]
    PodResources {
        namespace: String,
        name: String,
        #[command(flatten)]
        resources: ResourceArgs,
    },
    Deployments {
        #[arg(long, short = 'n')]
        namespace: Option<String>,
        #[arg(long)]
        all: bool,
    },
    CreateDeployment {
        namespace: String,
        name: String,
        image: String,
        #[arg(long, default_value_t = 1)]
        replicas: u32,
        #[arg(long, default_value = "")]
        labels: String,
        #[command(flatten)]
        resources: ResourceArgs,
    },
    DeleteDeployment { namespace: String, name: String },
    Scale { namespace: String, name: String, replicas: u32 },
    SetImage { namespace: String, name: String, image: String },
}

fn print_pods(pods: &[labdash::models::PodView]) {
    let rows = pods
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.namespace.clone(),
                p.status.clone(),
                p.image.clone(),
                p.node.clone(),
                p.restarts.map(|r| r.to_string()).unwrap_or_default(),
                p.labels_display(),
            ]
        })
        .collect();
    print_rows(
        "No pods.",
        vec!["Name", "Namespace", "Status", "Image", "Node", "Restarts", "Labels"],
        rows,
    );
}

pub async fn kubernetes(ctx: &CliContext, sub: K8sCommands) {
    use api::kubernetes as k8s;
    let api = &ctx.api;
    match sub {
        K8sCommands::Namespaces => {
            let rows = unwrap_list("namespaces", k8s::list_namespaces(api).await)
                .into_iter()
                .map(|n| vec![n.name.clone(), n.status.clone(), n.labels_display(), n.created.clone()])
                .collect();
            print_rows("No namespaces.", vec!["Name", "Status", "Labels", "Created"], rows);
        }
        K8sCommands::CreateNamespace { name, labels } => finish(
            k8s::create_namespace(api, &name, &parse_labels(&labels)).await,
            "Namespace created successfully",
            "Failed to create namespace",
        ),
        K8sCommands::DeleteNamespace { name } => finish(
            k8s::delete_namespace(api, &name).await,
            "Namespace deleted successfully",
            "Failed to delete namespace",
        ),
        K8sCommands::Pods { namespace, all } => {
            let pods = match namespace {
                Some(ns) if !all => k8s::list_pods(api, &ns).await,
                _ => k8s::list_all_pods(api, all).await,
            };
            print_pods(&unwrap_list("pods", pods));
        }
        K8sCommands::Pod { namespace, name } => match k8s::get_pod(api, &namespace, &name).await {
            Ok(pod) => print_pods(&[pod]),
            Err(e) => api_failure("Failed to load pod", &e),
        },
        K8sCommands::CreatePod {
            namespace,
            name,
            image,
            labels,
            resources,
        } => {
            let pod = NewPod {
                name,
                image,
                labels: parse_labels(&labels),
                resources: resources.into(),
            };
            finish(
                k8s::create_pod(api, &namespace, &pod).await,
                "Pod created successfully",
                "Failed to create pod",
            );
        }
        K8sCommands::DeletePod { namespace, name } => finish(
            k8s::delete_pod(api, &namespace, &name).await,
            "Pod deleted successfully",
            "Failed to delete pod",
        ),
        K8sCommands::PodResources {
            namespace,
            name,
            resources,
        } => finish(
            k8s::update_pod_resources(api, &namespace, &name, &resources.into()).await,
            "Pod resources updated",
            "Failed to update pod resources",
        ),
        K8sCommands::Deployments { namespace, all } => {
            let deployments = match namespace {
                Some(ns) if !all => k8s::list_deployments(api, &ns).await,
                _ => k8s::list_all_deployments(api, all).await,
            };
            let rows = unwrap_list("deployments", deployments)
                .into_iter()
                .map(|d| vec![d.name.clone(), d.namespace.clone(), d.ready_display(), d.image.clone()])
                .collect();
            print_rows("No deployments.", vec!["Name", "Namespace", "Ready", "Image"], rows);
        }
        K8sCommands::CreateDeployment {
            namespace,
            name,
            image,
            replicas,
            labels,
            resources,
        } => {
            let deployment = NewDeployment {
                name,
                image,
                replicas,
                labels: parse_labels(&labels),
                resources: resources.into(),
            };
            finish(
                k8s::create_deployment(api, &namespace, &deployment).await,
                "Deployment created successfully",
                "Failed to create deployment",
            );
        }
        K8sCommands::DeleteDeployment { namespace, name } => finish(
            k8s::delete_deployment(api, &namespace, &name).await,
            "Deployment deleted successfully",
            "Failed to delete deployment",
        ),
        K8sCommands::Scale {
            namespace,
            name,
            replicas,
        } => finish(
            k8s::scale_deployment(api, &namespace, &name, replicas).await,
            &format!("Deployment scaled to {} replicas", replicas),
            "Failed to scale deployment",
        ),
        K8sCommands::SetImage { namespace, name, image } => finish(
            k8s::update_deployment_image(api, &namespace, &name, &image).await,
            "Deployment image updated",
            "Failed to update deployment image",
        ),
    }
}

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List all users (admin)")]
    List,
    #[command(about = "List students")]
    Students,
    #[command(about = "Show your own profile")]
    Me,
    #[command(about = "Create a user", long_about = "Create a user with a role (STUDENT, TEACHER, ADMIN or SUPER_ADMIN).")]
    Create {
        username: String,
        password: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value = "STUDENT")]
        role: String,
    },
    #[command(about = "Update a user's email, password or role")]
    Update {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    Delete { id: String },
}

pub async fn users(ctx: &CliContext, sub: UserCommands) {
    let api = &ctx.api;
    match sub {
        UserCommands::List => print_users(&unwrap_list("users", api::users::list_users(api).await)),
        UserCommands::Students => print_users(&unwrap_list("students", api::users::list_students(api).await)),
        UserCommands::Me => match api::users::current_user(api).await {
            Ok(u) => print_users(&[u]),
            Err(e) => api_failure("Failed to load profile", &e),
        },
        UserCommands::Create {
            username,
            password,
            email,
            role,
        } => {
            let role = Role::parse_assignable(&role).unwrap_or_else(|message| fail(message));
            let user = NewUser {
                username,
                password,
                email: email.filter(|e| !e.trim().is_empty()),
                role: role.as_str().to_string(),
            };
            finish(
                api::users::create_user(api, &user).await,
                &format!("User {} created", user.username),
                "Failed to create user",
            );
        }
        UserCommands::Update {
            id,
            email,
            password,
            role,
        } => {
            let role = role.map(|r| Role::parse_assignable(&r).unwrap_or_else(|message| fail(message)));
            let update = UserUpdate {
                email,
                password,
                role: role.map(|r| r.as_str().to_string()),
            };
            if update.is_empty() {
                fail("Nothing to update: pass --email, --password or --role");
            }
            finish(
                api::users::update_user(api, &id, &update).await,
                "User updated",
                "Failed to update user",
            );
        }
        UserCommands::Delete { id } => finish(
            api::users::delete_user(api, &id).await,
            "User deleted",
            "Failed to delete user",
        ),
    }
}
