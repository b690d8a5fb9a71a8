use anyhow::Result;
use colored::*;
use dotenvy::dotenv;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dealer_backoffice::clients::api_client::RestTransport;
use dealer_backoffice::config::EnvironmentConfig;
use dealer_backoffice::models::attendance::AttendanceResource;
use dealer_backoffice::models::battery::{BatterySaleResource, BatteryServiceResource};
use dealer_backoffice::models::job_card::JobCardResource;
use dealer_backoffice::models::rickshaw::{
    LoanResource, RcBookResource, SalesInvoiceResource, SalesOrderResource,
};
use dealer_backoffice::models::spares::SparesInventoryResource;
use dealer_backoffice::models::Entity;
use dealer_backoffice::routes::{find_screen, is_under, ATTENDANCE_PATH, DASHBOARD_PATH};
use dealer_backoffice::services::session_gate::{relative_path, GateDecision, RedirectReason};
use dealer_backoffice::state::AppState;
use dealer_backoffice::{CrudController, SessionGate};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging (sin colores ANSI en producción)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_ansi(!config.is_production())
        .init();

    info!("🛺 Dealer Back-Office ({})", config.environment);

    let state = AppState::from_config(config)?;
    info!("🌐 Backend: {}", state.api.base_url());
    let gate = SessionGate::new(state.store.clone(), state.config.jwt_secret.clone());

    // modo de un solo comando: `backoffice open /user/battery/sales`
    let cli_args: Vec<String> = std::env::args().skip(1).collect();
    if let Some((command, rest)) = cli_args.split_first() {
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        return match run(&state, &gate, command, &args).await {
            Some(outcome) => outcome,
            None => Ok(()),
        };
    }

    println!("{}", "🛺 DEALER BACK-OFFICE".bright_blue().bold());
    println!("{}", "=====================".bright_blue());
    print_help();

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".bright_green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        match run(&state, &gate, command, &args).await {
            Some(Err(e)) => {
                error!("❌ {}", e);
                println!("{}", format!("❌ {}", e).bright_red());
            }
            Some(Ok(())) => {}
            None => break,
        }
    }

    println!("{}", "👋 ¡Hasta luego!".bright_green());
    Ok(())
}

/// Ejecutar un comando; `None` si el comando pide salir
async fn run(state: &AppState, gate: &SessionGate, command: &str, args: &[&str]) -> Option<Result<()>> {
    let outcome = match command {
        "login" => login(gate, args),
        "logout" => gate.logout().map_err(Into::into),
        "nav" => {
            print_navigation(gate);
            Ok(())
        }
        "open" => open(state, gate, args).await,
        "delete" => delete(state, gate, args).await,
        "help" => {
            print_help();
            Ok(())
        }
        "quit" | "exit" => return None,
        other => Err(anyhow::anyhow!("Comando desconocido: {}", other)),
    };
    Some(outcome)
}

fn print_help() {
    println!();
    println!("{}", "📋 COMANDOS".bright_green().bold());
    println!("  login <token>          Guardar el token emitido por el backend");
    println!("  logout                 Cerrar sesión");
    println!("  nav                    Mostrar el menú permitido");
    println!("  open <ruta> [buscar]   Listar una pantalla (p. ej. /user/battery/sales)");
    println!("  delete <ruta> <id>     Eliminar un registro de la pantalla");
    println!("  quit                   Salir");
    println!();
}

fn login(gate: &SessionGate, args: &[&str]) -> Result<()> {
    let Some(token) = args.first() else {
        anyhow::bail!("Uso: login <token>");
    };
    gate.store_token(token)?;
    let landing = gate.default_landing();
    println!("{} {}", "🔑 Sesión iniciada →".bright_cyan(), landing);
    Ok(())
}

fn print_navigation(gate: &SessionGate) {
    let Some(nav) = gate.navigation() else {
        println!("{}", "🔒 Sin sesión válida. Usa: login <token>".bright_yellow());
        return;
    };
    println!("{} {}", "🏠 Inicio:".bright_cyan(), gate.default_landing());

    if let Some(link) = nav.dashboard_link() {
        println!("{} {}", link.label.bright_white().bold(), link.path.dimmed());
    }
    for section in nav.sections() {
        println!("{}", section.label().bright_white().bold());
        for link in nav.section_links(*section) {
            println!("   {} {}", link.label, link.path.dimmed());
        }
    }
    if let Some(link) = nav.attendance_link() {
        println!("{} {}", link.label.bright_white().bold(), link.path.dimmed());
    }
}

/// Resultado de resolver una ruta tras pasar el gate
enum Screen {
    Dashboard,
    Resource(&'static str),
}

fn resolve(gate: &SessionGate, path: &str) -> Option<Screen> {
    match gate.check(path) {
        GateDecision::Allow(user) => {
            let relative = relative_path(&user.role, path)?;
            if is_under(relative, DASHBOARD_PATH) {
                return Some(Screen::Dashboard);
            }
            if is_under(relative, ATTENDANCE_PATH) {
                return Some(Screen::Resource(AttendanceResource::RESOURCE));
            }
            match find_screen(relative) {
                Some(screen) => Some(Screen::Resource(screen.resource)),
                None => {
                    println!("{}", format!("ℹ️ {} no tiene listado propio", path).bright_yellow());
                    None
                }
            }
        }
        GateDecision::Redirect { to, reason } => {
            let why = match reason {
                RedirectReason::Unauthenticated(e) => format!("sesión inválida ({})", e),
                RedirectReason::Forbidden => "ruta no permitida".to_string(),
                RedirectReason::AlreadyAuthenticated => "ya hay sesión".to_string(),
            };
            println!("{} {} ({})", "↪️ Redirigido a".bright_yellow(), to, why);
            None
        }
    }
}

async fn open(state: &AppState, gate: &SessionGate, args: &[&str]) -> Result<()> {
    let Some(path) = args.first() else {
        anyhow::bail!("Uso: open <ruta> [buscar]");
    };
    let search = args[1..].join(" ");
    let transport = transport(state)?;

    match resolve(gate, path) {
        Some(Screen::Dashboard) => println!("{}", "📊 Dashboard".bright_blue().bold()),
        Some(Screen::Resource(resource)) => match resource {
            RcBookResource::RESOURCE => show::<RcBookResource>(transport, &search).await,
            SalesInvoiceResource::RESOURCE => show::<SalesInvoiceResource>(transport, &search).await,
            SalesOrderResource::RESOURCE => show::<SalesOrderResource>(transport, &search).await,
            LoanResource::RESOURCE => show::<LoanResource>(transport, &search).await,
            BatterySaleResource::RESOURCE => show::<BatterySaleResource>(transport, &search).await,
            BatteryServiceResource::RESOURCE => show::<BatteryServiceResource>(transport, &search).await,
            SparesInventoryResource::RESOURCE => show::<SparesInventoryResource>(transport, &search).await,
            JobCardResource::RESOURCE => show::<JobCardResource>(transport, &search).await,
            AttendanceResource::RESOURCE => show::<AttendanceResource>(transport, &search).await,
            other => println!("{}", format!("❌ Recurso sin pantalla: {}", other).bright_red()),
        },
        None => {}
    }
    Ok(())
}

async fn delete(state: &AppState, gate: &SessionGate, args: &[&str]) -> Result<()> {
    let [path, id] = args else {
        anyhow::bail!("Uso: delete <ruta> <id>");
    };
    let transport = transport(state)?;

    let Some(Screen::Resource(resource)) = resolve(gate, path) else {
        return Ok(());
    };
    match resource {
        RcBookResource::RESOURCE => remove::<RcBookResource>(transport, id).await,
        SalesInvoiceResource::RESOURCE => remove::<SalesInvoiceResource>(transport, id).await,
        SalesOrderResource::RESOURCE => remove::<SalesOrderResource>(transport, id).await,
        LoanResource::RESOURCE => remove::<LoanResource>(transport, id).await,
        BatterySaleResource::RESOURCE => remove::<BatterySaleResource>(transport, id).await,
        BatteryServiceResource::RESOURCE => remove::<BatteryServiceResource>(transport, id).await,
        SparesInventoryResource::RESOURCE => remove::<SparesInventoryResource>(transport, id).await,
        JobCardResource::RESOURCE => remove::<JobCardResource>(transport, id).await,
        AttendanceResource::RESOURCE => remove::<AttendanceResource>(transport, id).await,
        other => println!("{}", format!("❌ Recurso sin pantalla: {}", other).bright_red()),
    }
    Ok(())
}

/// Cliente con el token vigente (puede haber cambiado tras `login`)
fn transport(state: &AppState) -> Result<Arc<dyn RestTransport>> {
    let token = state.store.load()?.token;
    Ok(Arc::new(state.api.clone().with_token(token)))
}

async fn show<E: Entity>(transport: Arc<dyn RestTransport>, search: &str) {
    let mut controller = CrudController::<E>::new(transport);
    controller.set_search(search);
    // el error queda en el banner del controlador
    let _ = controller.list().await;
    print_table(&controller);
}

async fn remove<E: Entity>(transport: Arc<dyn RestTransport>, id: &str) {
    let mut controller = CrudController::<E>::new(transport);
    let _ = controller.list().await;

    match controller.remove(id, confirm).await {
        Ok(true) => println!("{}", format!("🗑️ {} {} eliminado", E::LABEL, id).bright_green()),
        Ok(false) => println!("{}", "🚫 Cancelado".bright_yellow()),
        Err(_) => {}
    }
    print_table(&controller);
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt.bright_yellow());
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

fn print_table<E: Entity>(controller: &CrudController<E>) {
    println!();
    println!("{}", E::LABEL.bright_blue().bold());
    if let Some(message) = controller.last_error() {
        println!("{}", format!("❌ {}", message).bright_red());
    }

    let rows: Vec<Vec<String>> = controller.visible().into_iter().map(E::row).collect();
    let mut widths: Vec<usize> = E::COLUMNS.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = E::COLUMNS
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column, width = width))
        .collect();
    println!("{}", header.join(" │ ").bold());
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        println!("{}", cells.join(" │ "));
    }
    if rows.is_empty() {
        println!("{}", "(sin registros)".dimmed());
    }
}
