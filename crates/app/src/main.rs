//! Sonatina - piano school scheduler
//!
//! Opens the signed-in account's timetable on the current week, logs it, and
//! keeps attendance up to date from the push feed until interrupted.

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sonatina_app::viewmodel::{AttendanceSheet, ClassListViewModel, SchedulerViewModel};
use sonatina_app::{AppConfig, AppState, PortalRole, Result};
use sonatina_net::{Error as NetError, PushClient};

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Sonatina");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run()) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::load()?;
    let state = AppState::new(config, AppConfig::token_from_env())?;

    let today = chrono::Local::now().date_naive();
    let mut scheduler = SchedulerViewModel::open_current_week(today)?;
    scheduler.set_filters(state.slot_filters());
    scheduler.load(state.api.as_ref(), &state.auth).await?;
    log_week(&scheduler);

    let mut classes = ClassListViewModel::default();
    match classes.load(state.api.as_ref(), &state.auth).await {
        Ok(()) => tracing::info!(total = classes.visible().total_items, "Classes"),
        Err(e) => tracing::warn!(error = %e, "Could not load classes"),
    }

    if state.config.account.role == PortalRole::Teacher {
        log_todays_attendance(&state, &scheduler, today).await;
    }

    // Subscribe before the feed starts so no early notification is missed
    let (tx, mut rx) = mpsc::unbounded_channel();
    let subscription = state.hub.subscribe(move |notification| {
        let _ = tx.send(notification);
    });

    let push = match state.config.push.socket_addr()? {
        Some(addr) => {
            match PushClient::connect(addr, &state.auth, state.config.push.topics.clone(), state.hub.clone()).await {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "Push feed unavailable, timetable will not refresh");
                    None
                }
            }
        }
        None => None,
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            notification = rx.recv() => {
                let Some(notification) = notification else { break };
                let refreshed = scheduler
                    .apply_notification(state.api.as_ref(), &state.auth, &notification)
                    .await;
                if let Some(failed) = refreshed {
                    if failed > 0 {
                        tracing::warn!(failed, "Some slots kept their last known attendance");
                    }
                    log_week(&scheduler);
                }
            }
        }
    }

    subscription.unsubscribe();
    if let Some(push) = push {
        match push.disconnect().await {
            Ok(()) | Err(NetError::NotConnected) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to close push feed"),
        }
    }
    Ok(())
}

fn log_week(scheduler: &SchedulerViewModel) {
    tracing::info!(
        year = scheduler.year(),
        week = %scheduler.week(),
        week_number = scheduler.week_number(),
        slots = scheduler.grid().len(),
        "Timetable"
    );
    for line in scheduler.grid_lines() {
        tracing::info!("{}", line);
    }
}

/// Roster counts for each of today's slots
async fn log_todays_attendance(state: &AppState, scheduler: &SchedulerViewModel, today: NaiveDate) {
    for slot in scheduler.slots().iter().filter(|s| s.date == today) {
        match AttendanceSheet::load(state.api.as_ref(), &state.auth, slot.id).await {
            Ok(sheet) => {
                let summary = sheet.summary();
                tracing::info!(
                    slot_id = slot.id,
                    class = %sheet.slot().class.name,
                    attended = summary.attended,
                    absent = summary.absent,
                    not_yet = summary.not_yet,
                    "Attendance"
                );
            }
            Err(e) => tracing::warn!(slot_id = slot.id, error = %e, "Could not load attendance"),
        }
    }
}
