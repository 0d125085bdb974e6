//! Two workers racing the same completion: exactly one write wins, the
//! loser gets a terminal duplicate-completion error, and the stored
//! evidence is the winner's.

use chrono::{TimeZone, Utc};
use cleanops_domain::infrastructure::{
    FixedClock, InMemoryReportStore, InMemoryTaskStore, InMemoryUserDirectory,
    InMemoryZoneDirectory, ReportStore, TaskStore,
};
use cleanops_domain::{
    AggregateRoot, AssignmentRequest, AssignmentResolver, DomainError, EvidenceSubmission,
    GeoLocation, GeoPoint, Identity, LifecycleEngine, MinimumPhotoPolicy, NewReport,
    NullEventPublisher, PhotoRef, Priority, ProblemType, ReportStatus, TaskId, TaskStatus, User,
    UserId, UserRole, Zone, ZoneId,
};
use std::sync::{Arc, Barrier};
use std::thread;

fn racing_world() -> (Arc<LifecycleEngine>, Identity, TaskId, Arc<InMemoryReportStore>, Arc<InMemoryTaskStore>) {
    let now = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
    let reports = Arc::new(InMemoryReportStore::new());
    let tasks = Arc::new(InMemoryTaskStore::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    let zones = Arc::new(InMemoryZoneDirectory::new());
    let clock = Arc::new(FixedClock::at(now));
    let publisher = Arc::new(NullEventPublisher);

    let supervisor_id = UserId::new();
    let zone = Zone::new(
        ZoneId::new(),
        "Zona Centro",
        supervisor_id,
        "Carlos Rodríguez",
        vec![
            GeoPoint {
                latitude: 4.6097,
                longitude: -74.0817,
            },
            GeoPoint {
                latitude: 4.6120,
                longitude: -74.0790,
            },
            GeoPoint {
                latitude: 4.6100,
                longitude: -74.0750,
            },
        ],
        now,
    )
    .unwrap();
    let zone_id = zone.id();
    zones.insert(zone);

    let citizen = User::new(
        UserId::new(),
        "María García",
        "maria@example.com",
        None,
        UserRole::Citizen,
        None,
        now,
    )
    .unwrap();
    let supervisor = User::new(
        supervisor_id,
        "Carlos Rodríguez",
        "carlos@example.com",
        None,
        UserRole::Supervisor,
        Some(zone_id),
        now,
    )
    .unwrap();
    let worker = User::new(
        UserId::new(),
        "Juan Pérez",
        "juan@example.com",
        None,
        UserRole::Worker,
        Some(zone_id),
        now,
    )
    .unwrap();
    let citizen_identity = Identity::from_user(&citizen);
    let supervisor_identity = Identity::from_user(&supervisor);
    let worker_identity = Identity::from_user(&worker);
    users.insert(citizen);
    users.insert(supervisor);
    users.insert(worker);

    let engine = Arc::new(LifecycleEngine::new(
        reports.clone(),
        tasks.clone(),
        users.clone(),
        zones,
        clock.clone(),
        publisher.clone(),
        Arc::new(MinimumPhotoPolicy::default()),
    ));
    let resolver = AssignmentResolver::new(
        reports.clone(),
        tasks.clone(),
        users,
        clock,
        publisher,
    );

    let report = engine
        .submit_report(
            &citizen_identity,
            NewReport {
                problem_type: ProblemType::Sweeping,
                description: "Street covered in leaves after the storm".to_string(),
                location: GeoLocation::new(4.6110, -74.0800, "Carrera 12 #18-30, Centro"),
                photos: vec![],
                priority: Priority::Medium,
                zone_id,
            },
        )
        .unwrap();
    let outcome = resolver
        .assign(
            &supervisor_identity,
            AssignmentRequest {
                report_id: report.id(),
                worker_id: worker_identity.user_id,
                priority: Priority::Medium,
                instructions: None,
            },
        )
        .unwrap();
    engine.start_task(&worker_identity, outcome.task.id()).unwrap();

    (engine, worker_identity, outcome.task.id(), reports, tasks)
}

#[test]
fn racing_completions_commit_exactly_once() {
    let (engine, worker, task_id, reports, tasks) = racing_world();
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = ["first.jpg", "second.jpg"]
        .into_iter()
        .map(|photo| {
            let engine = engine.clone();
            let worker = worker.clone();
            let barrier = barrier.clone();
            let submission = EvidenceSubmission::new(vec![PhotoRef::from(photo)], None);
            thread::spawn(move || {
                barrier.wait();
                engine.complete_task(&worker, task_id, submission)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("completion thread panicked"))
        .collect();

    let successes: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
    let failures: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(successes.len(), 1, "exactly one completion must commit");
    assert_eq!(failures.len(), 1);
    assert!(
        matches!(failures[0], DomainError::AlreadyCompleted { .. }),
        "loser must see a terminal duplicate-completion error, got {:?}",
        failures[0]
    );

    // stored state matches the winner
    let task = tasks.get(task_id).unwrap();
    assert_eq!(task.status(), TaskStatus::Completed);
    let winner = successes[0].as_ref().unwrap();
    assert_eq!(task.evidence(), winner.task.evidence());

    let report = reports.get(task.report_id()).unwrap();
    assert_eq!(report.status(), ReportStatus::Resolved);
    assert_eq!(report.evidence(), winner.task.evidence());
}

#[test]
fn sequential_duplicate_completion_is_already_completed() {
    let (engine, worker, task_id, _reports, _tasks) = racing_world();

    engine
        .complete_task(
            &worker,
            task_id,
            EvidenceSubmission::new(vec![PhotoRef::from("after.jpg")], None),
        )
        .unwrap();

    let err = engine
        .complete_task(
            &worker,
            task_id,
            EvidenceSubmission::new(vec![PhotoRef::from("again.jpg")], None),
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadyCompleted { .. }));
}
