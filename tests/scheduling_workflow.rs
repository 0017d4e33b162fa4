//! End-to-end scheduling workflow against the in-memory console.

use chrono::{NaiveDate, Utc};
use u_shopfloor::api::Severity;
use u_shopfloor::board::ScheduleBoard;
use u_shopfloor::config::ConsoleConfig;
use u_shopfloor::error::{RemoteError, WorkflowError};
use u_shopfloor::ingest::{Importer, JobEntry};
use u_shopfloor::memory::{InMemoryConsole, RecordingNotifier};
use u_shopfloor::models::{format_duration, DurationParts, Job, MachineType};
use u_shopfloor::scheduler::{ScheduleReconciler, SchedulingSession, SessionState};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
}

#[tokio::test]
async fn test_import_schedule_edit_delete() {
    let config = ConsoleConfig::from_toml_str("").unwrap();
    let console = InMemoryConsole::new().with_machine_types([MachineType::new(1, "Type 1")]);
    let notifier = RecordingNotifier::default();
    let importer = Importer::new(console.clone(), notifier.clone());
    let reconciler = ScheduleReconciler::from_config(console.clone(), notifier.clone(), &config);

    // Bulk import two jobs, then one through the form.
    importer
        .import_jobs_json(
            r#"[
                {"title":"Cut","duration":3600,"requiredMachineType":{"id":1,"name":"Type 1"}},
                {"title":"Bend","duration":5400,"requiredMachineType":{"id":1,"name":"Type 1"}}
            ]"#,
        )
        .await
        .unwrap();
    importer
        .import_job_entry(JobEntry::new(
            Job::new("Polish").with_machine_type(MachineType::new(1, "Type 1")),
            DurationParts::new(0, 20, 0),
        ))
        .await
        .unwrap();
    assert_eq!(console.calls().import_batch, 2);

    let mut board = ScheduleBoard::new();
    board.reload(&console).await.unwrap();
    board.reload_machine_types(&console).await.unwrap();
    assert_eq!(board.jobs().len(), 3);
    assert_eq!(board.machine_types().len(), 1);

    let bend = board.jobs().iter().find(|j| j.title == "Bend").cloned().unwrap();
    assert_eq!(format_duration(bend.duration), "1h 30m");

    // Schedule "Bend" at the third slot of the day.
    let mut session = SchedulingSession::new(config.working_day.slots_on(day(), &Utc));
    let start = session.slots()[2];
    session.open_for_job(bend.clone());
    session.set_start_time(Some(start)).unwrap();
    session.set_due_date(Some(session.slots()[19])).unwrap();
    assert_eq!(
        session.projected_end(),
        Some(start + chrono::Duration::seconds(5400))
    );

    let created = reconciler.submit(&mut session, &mut board).await.unwrap();
    assert!(session.is_idle());
    assert_eq!(created.duration, Some(5400));
    assert_eq!(created.machine_type_id, Some(1));
    assert_eq!(board.schedules().len(), 1);

    // The job's duration changes later; the schedule keeps its copy.
    let mut longer = bend.clone();
    longer.duration = Some(7200);
    u_shopfloor::api::JobDirectory::update_job(&console, &longer)
        .await
        .unwrap();
    board.reload(&console).await.unwrap();

    session.open_for_schedule(created.clone(), board.job_for(&created).cloned());
    assert!(matches!(session.state(), SessionState::Editing { .. }));
    session.set_start_time(Some(session.slots()[4])).unwrap();
    assert_eq!(session.duration(), Some(5400));
    let updated = reconciler.submit(&mut session, &mut board).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.duration, Some(5400));
    assert_eq!(console.calls().create_schedule, 1);
    assert_eq!(console.calls().update_schedule, 1);

    reconciler.delete(&updated, &mut board).await.unwrap();
    assert!(board.schedules().is_empty());
    assert!(notifier
        .notices()
        .iter()
        .all(|n| n.severity == Severity::Success));
}

#[tokio::test]
async fn test_remote_failure_leaves_board_unchanged() {
    let console = InMemoryConsole::new().with_jobs([Job::new("Cut")
        .with_duration(60)
        .with_machine_type(MachineType::new(1, "Saw"))]);
    let notifier = RecordingNotifier::default();
    let reconciler = ScheduleReconciler::new(console.clone(), notifier.clone());
    let mut board = ScheduleBoard::new();
    board.reload(&console).await.unwrap();

    let mut session = SchedulingSession::new(u_shopfloor::models::WorkingDay::default().slots_on(day(), &Utc));
    session.open_for_job(board.jobs()[0].clone());
    session.set_start_time(Some(session.slots()[0])).unwrap();
    session.set_due_date(Some(session.slots()[1])).unwrap();

    console.fail_next(RemoteError::status(502));
    let err = reconciler.submit(&mut session, &mut board).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Remote(_)));
    assert!(!session.is_idle());
    assert!(board.schedules().is_empty());
    assert_eq!(
        notifier.last().map(|n| n.message),
        Some(
            "The scheduled job could not be created: The request could not be completed. Please try again later."
                .to_string()
        )
    );
}
