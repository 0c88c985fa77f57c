//! Behaviour every `EntityStore` backend must share. Each backend's test
//! module runs these checks against a fresh, empty store.

use super::{DateFilter, EntityStore};
use crate::domain::dates::parse_date;
use crate::domain::{Subtask, Task};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn ids(tasks: &[Task]) -> Vec<i64> {
    tasks.iter().map(|t| t.id).collect()
}

pub fn run_all<S: EntityStore>(store: &mut S) {
    assert_eq!(store.max_id().unwrap(), None);
    store.health_check().unwrap();

    rows_and_filters(store);
    subtasks_nest_in_id_order(store);
    updates_report_matches(store);
    cascade_delete(store);
    bulk_subtask_completion(store);
}

fn rows_and_filters<S: EntityStore>(store: &mut S) {
    store.insert_task(&Task::new(100, "first".to_string(), date("2024-01-01"))).unwrap();
    store.insert_task(&Task::new(200, "second".to_string(), date("2024-01-02"))).unwrap();
    store.insert_task(&Task::new(300, "third".to_string(), date("2024-01-01"))).unwrap();

    assert_eq!(ids(&store.load_tasks(DateFilter::All).unwrap()), vec![100, 200, 300]);
    assert_eq!(
        ids(&store.load_tasks(DateFilter::On(date("2024-01-01"))).unwrap()),
        vec![100, 300]
    );
    assert_eq!(
        ids(&store.load_tasks(DateFilter::After(date("2024-01-01"))).unwrap()),
        vec![200]
    );

    let found = store.find_task(200).unwrap().unwrap();
    assert_eq!(found.text, "second");
    assert!(!found.completed);
    assert!(store.find_task(999).unwrap().is_none());
    assert_eq!(store.max_id().unwrap(), Some(300));
}

fn subtasks_nest_in_id_order<S: EntityStore>(store: &mut S) {
    assert!(store.insert_subtask(&Subtask::new(102, 100, "b".to_string())).unwrap());
    assert!(store.insert_subtask(&Subtask::new(101, 100, "a".to_string())).unwrap());
    assert!(!store.insert_subtask(&Subtask::new(103, 999, "orphan".to_string())).unwrap());
    assert!(store.find_subtask(103).unwrap().is_none());

    let task = store.find_task(100).unwrap().unwrap();
    let sub_ids: Vec<i64> = task.subtasks.iter().map(|st| st.id).collect();
    assert_eq!(sub_ids, vec![101, 102]);
    assert!(task.subtasks.iter().all(|st| st.task_id == 100));

    let all = store.load_tasks(DateFilter::All).unwrap();
    assert_eq!(all[0].subtasks.len(), 2);
    assert!(all[1].subtasks.is_empty());
}

fn updates_report_matches<S: EntityStore>(store: &mut S) {
    let mut task = store.find_task(100).unwrap().unwrap();
    task.text = "renamed".to_string();
    task.completed = true;
    task.date = date("2024-02-01");
    task.subtasks.clear();
    assert!(store.update_task(&task).unwrap());

    let reloaded = store.find_task(100).unwrap().unwrap();
    assert_eq!(reloaded.text, "renamed");
    assert!(reloaded.completed);
    assert_eq!(reloaded.date, date("2024-02-01"));
    // Task updates never touch subtasks
    assert_eq!(reloaded.subtasks.len(), 2);

    assert!(!store.update_task(&Task::new(999, "x".to_string(), date("2024-01-01"))).unwrap());

    let mut sub = store.find_subtask(101).unwrap().unwrap();
    sub.completed = true;
    sub.text = "a2".to_string();
    assert!(store.update_subtask(&sub).unwrap());
    assert_eq!(store.find_subtask(101).unwrap(), Some(sub));
    assert!(!store.update_subtask(&Subtask::new(999, 100, "x".to_string())).unwrap());

    assert!(store.delete_subtask(102).unwrap());
    assert!(!store.delete_subtask(102).unwrap());
    assert_eq!(store.find_task(100).unwrap().unwrap().subtasks.len(), 1);
}

fn cascade_delete<S: EntityStore>(store: &mut S) {
    assert!(store.insert_subtask(&Subtask::new(301, 300, "keep".to_string())).unwrap());

    assert!(store.delete_task(100).unwrap());
    assert!(!store.delete_task(100).unwrap());
    assert!(store.find_task(100).unwrap().is_none());
    assert!(store.find_subtask(101).unwrap().is_none());

    // Subtasks of other tasks survive
    assert!(store.find_subtask(301).unwrap().is_some());
    assert_eq!(ids(&store.load_tasks(DateFilter::All).unwrap()), vec![200, 300]);
}

fn bulk_subtask_completion<S: EntityStore>(store: &mut S) {
    assert!(store.insert_subtask(&Subtask::new(302, 300, "more".to_string())).unwrap());

    assert_eq!(store.set_all_subtasks_completed(300, true).unwrap(), 2);
    let task = store.find_task(300).unwrap().unwrap();
    assert!(task.subtasks.iter().all(|st| st.completed));

    assert_eq!(store.set_all_subtasks_completed(200, true).unwrap(), 0);
    assert_eq!(store.max_id().unwrap(), Some(302));
}
