//! Query/aggregation layer properties.

mod common;

use std::collections::HashMap;

use tracker::contract::model::{NewComment, NewTask, TaskStatus};

use common::{new_project, new_task, register_user, test_service};

#[tokio::test]
async fn task_counts_include_zero_task_projects() {
    let service = test_service().await;
    let owner = register_user(&service, "owner").await;
    let busy = service
        .create_project(owner.id, new_project("Busy"))
        .await
        .unwrap();
    let idle = service
        .create_project(owner.id, new_project("Idle"))
        .await
        .unwrap();
    service
        .create_task(new_task("a", busy.project.id))
        .await
        .unwrap();
    service
        .create_task(new_task("b", busy.project.id))
        .await
        .unwrap();

    let counts: HashMap<_, _> = service
        .projects_with_task_count()
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.id, c.task_count))
        .collect();

    assert_eq!(counts[&busy.project.id], 2);
    assert_eq!(counts[&idle.project.id], 0);
}

#[tokio::test]
async fn comment_counts_sum_over_all_project_tasks() {
    let service = test_service().await;
    let owner = register_user(&service, "owner").await;
    let project = service
        .create_project(owner.id, new_project("Alpha"))
        .await
        .unwrap();
    let empty = service
        .create_project(owner.id, new_project("Empty"))
        .await
        .unwrap();
    let t1 = service
        .create_task(new_task("t1", project.project.id))
        .await
        .unwrap();
    let t2 = service
        .create_task(new_task("t2", project.project.id))
        .await
        .unwrap();
    for (task_id, n) in [(t1.task.id, 2), (t2.task.id, 1)] {
        for i in 0..n {
            service
                .create_comment(
                    owner.id,
                    NewComment {
                        content: format!("comment {i}"),
                        task_id,
                    },
                )
                .await
                .unwrap();
        }
    }

    let counts: HashMap<_, _> = service
        .projects_with_comment_count()
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.id, c.comment_count))
        .collect();

    assert_eq!(counts[&project.project.id], 3);
    assert_eq!(counts[&empty.project.id], 0);
}

#[tokio::test]
async fn recent_tasks_are_newest_first_and_capped() {
    let service = test_service().await;
    let owner = register_user(&service, "owner").await;
    let project = service
        .create_project(owner.id, new_project("Alpha"))
        .await
        .unwrap();
    for i in 0..7 {
        service
            .create_task(new_task(&format!("task {i}"), project.project.id))
            .await
            .unwrap();
    }

    let recent = service.recent_tasks(5).await.unwrap();
    assert_eq!(recent.len(), 5);
    for pair in recent.windows(2) {
        assert!(pair[0].task.created_at >= pair[1].task.created_at);
    }

    // Never more than requested, even if fewer exist.
    let few = service.recent_tasks(100).await.unwrap();
    assert_eq!(few.len(), 7);
}

#[tokio::test]
async fn tasks_by_status_filters_exactly_and_none_means_all() {
    let service = test_service().await;
    let owner = register_user(&service, "owner").await;
    let project = service
        .create_project(owner.id, new_project("Alpha"))
        .await
        .unwrap();
    for (title, status) in [
        ("a", TaskStatus::Todo),
        ("b", TaskStatus::Todo),
        ("c", TaskStatus::Done),
    ] {
        service
            .create_task(NewTask {
                status,
                ..new_task(title, project.project.id)
            })
            .await
            .unwrap();
    }

    let todo = service
        .tasks_by_status(Some(TaskStatus::Todo))
        .await
        .unwrap();
    assert_eq!(todo.len(), 2);
    assert!(todo.iter().all(|t| t.task.status == TaskStatus::Todo));

    let all = service.tasks_by_status(None).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn tasks_by_user_requires_an_explicit_filter() {
    let service = test_service().await;
    let owner = register_user(&service, "owner").await;
    let worker = register_user(&service, "worker").await;
    let project = service
        .create_project(owner.id, new_project("Alpha"))
        .await
        .unwrap();
    service
        .create_task(NewTask {
            assigned_to: Some(worker.id),
            ..new_task("mine", project.project.id)
        })
        .await
        .unwrap();
    service
        .create_task(new_task("unassigned", project.project.id))
        .await
        .unwrap();

    // Omission is an empty list, not "all tasks".
    assert!(service.tasks_by_user(None).await.unwrap().is_empty());

    let assigned = service.tasks_by_user(Some(worker.id)).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].task.assigned_to, Some(worker.id));
}

#[tokio::test]
async fn status_summary_omits_empty_statuses() {
    let service = test_service().await;
    let owner = register_user(&service, "owner").await;
    let project = service
        .create_project(owner.id, new_project("Alpha"))
        .await
        .unwrap();
    for (title, status) in [
        ("a", TaskStatus::Todo),
        ("b", TaskStatus::InProgress),
        ("c", TaskStatus::Done),
    ] {
        service
            .create_task(NewTask {
                status,
                ..new_task(title, project.project.id)
            })
            .await
            .unwrap();
    }

    let summary: HashMap<_, _> = service
        .task_status_summary()
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.status, s.count))
        .collect();
    assert_eq!(summary.len(), 3);
    assert_eq!(summary[&TaskStatus::Todo], 1);
    assert_eq!(summary[&TaskStatus::InProgress], 1);
    assert_eq!(summary[&TaskStatus::Done], 1);

    // Drain one status; it must disappear from the summary.
    let todo = service
        .tasks_by_status(Some(TaskStatus::Todo))
        .await
        .unwrap();
    for t in todo {
        service.delete_task(t.task.id).await.unwrap();
    }
    let summary = service.task_status_summary().await.unwrap();
    assert_eq!(summary.len(), 2);
    assert!(summary.iter().all(|s| s.status != TaskStatus::Todo));
}

#[tokio::test]
async fn average_tasks_per_project_guards_division_by_zero() {
    let service = test_service().await;

    // No projects at all: undefined, not an error.
    assert_eq!(service.average_tasks_per_project().await.unwrap(), None);

    let owner = register_user(&service, "owner").await;
    let alpha = service
        .create_project(owner.id, new_project("Alpha"))
        .await
        .unwrap();
    for title in ["a", "b", "c"] {
        service
            .create_task(new_task(title, alpha.project.id))
            .await
            .unwrap();
    }

    // Single project with three tasks.
    assert_eq!(
        service.average_tasks_per_project().await.unwrap(),
        Some(3.0)
    );

    // A second, empty project halves the mean.
    service
        .create_project(owner.id, new_project("Beta"))
        .await
        .unwrap();
    assert_eq!(
        service.average_tasks_per_project().await.unwrap(),
        Some(1.5)
    );
}

#[tokio::test]
async fn list_projects_active_filter() {
    let service = test_service().await;
    let owner = register_user(&service, "owner").await;
    service
        .create_project(owner.id, new_project("Active"))
        .await
        .unwrap();
    let mut inactive = new_project("Inactive");
    inactive.is_active = false;
    service.create_project(owner.id, inactive).await.unwrap();

    assert_eq!(service.list_projects(None).await.unwrap().len(), 2);

    let active = service.list_projects(Some(true)).await.unwrap();
    assert_eq!(active.len(), 1);
    assert!(active[0].is_active);

    let inactive = service.list_projects(Some(false)).await.unwrap();
    assert_eq!(inactive.len(), 1);
    assert!(!inactive[0].is_active);
}

#[tokio::test]
async fn task_comments_lists_all_comments_for_the_task() {
    let service = test_service().await;
    let owner = register_user(&service, "owner").await;
    let project = service
        .create_project(owner.id, new_project("Alpha"))
        .await
        .unwrap();
    let task = service
        .create_task(new_task("t", project.project.id))
        .await
        .unwrap();
    let other = service
        .create_task(new_task("other", project.project.id))
        .await
        .unwrap();
    for i in 0..2 {
        service
            .create_comment(
                owner.id,
                NewComment {
                    content: format!("c{i}"),
                    task_id: task.task.id,
                },
            )
            .await
            .unwrap();
    }
    service
        .create_comment(
            owner.id,
            NewComment {
                content: "elsewhere".to_string(),
                task_id: other.task.id,
            },
        )
        .await
        .unwrap();

    let comments = service.task_comments(task.task.id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert!(comments.iter().all(|c| c.comment.task_id == task.task.id));
}
