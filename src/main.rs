use std::sync::Arc;

use learnable_progress::{
    app_state::AppState, auth::StaticIdentity, config::Config, errors::AppError,
};

/// Maintenance entry point: rebuilds the progress summaries of every student
/// id given on the command line.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let student_ids: Vec<String> = std::env::args().skip(1).collect();
    if student_ids.is_empty() {
        log::warn!("No student ids given; usage: learnable-progress <student-id>...");
        return Ok(());
    }

    let config = Config::from_env();
    config.validate()?;

    let state = AppState::new(config, Arc::new(StaticIdentity::anonymous())).await?;

    let mut failures = 0;
    for student_id in &student_ids {
        match state.cascade.rebuild_student(student_id).await {
            Ok(report) => log::info!(
                "Student {}: {} lesson(s), {} subject(s) rebuilt",
                student_id,
                report.lessons_written,
                report.subjects_written
            ),
            Err(err) => {
                failures += 1;
                log::error!(
                    "Rebuild failed for student {} ({}): {}",
                    student_id,
                    err.error_code(),
                    err
                );
            }
        }
    }

    if failures > 0 {
        return Err(AppError::InternalError(format!(
            "{} of {} rebuild(s) failed",
            failures,
            student_ids.len()
        )));
    }

    Ok(())
}
