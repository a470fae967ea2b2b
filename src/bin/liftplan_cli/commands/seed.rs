// ABOUTME: Demo data seeding for liftplan-cli
// ABOUTME: Creates a small exercise catalog, four sessions, a five-week level and a subscribed user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::display::print_json;
use anyhow::Result;
use chrono::{Duration, NaiveTime, Utc};
use liftplan::constants::plan::{DAYS_PER_WEEK, WEEKS_PER_PLAN};
use liftplan::database_plugins::sqlite::SqliteDatabase;
use liftplan::models::{
    DayKey, DayOverride, Difficulty, Exercise, Placement, SessionItem, SessionTemplate,
    TargetReps, WeekOverride, WeekTemplate,
};
use liftplan::plans::{AssignSubscriptionRequest, PlanAdminService};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const DEMO_LEVEL_NAME: &str = "Foundations";

/// (name, muscle group, equipment)
const DEMO_EXERCISES: [(&str, &str, &str); 8] = [
    ("Back Squat", "legs", "barbell"),
    ("Goblet Squat", "legs", "dumbbell"),
    ("Bench Press", "chest", "barbell"),
    ("Dumbbell Press", "chest", "dumbbell"),
    ("Barbell Row", "back", "barbell"),
    ("Romanian Deadlift", "hamstrings", "barbell"),
    ("Overhead Press", "shoulders", "barbell"),
    ("Pull-up", "back", "bodyweight"),
];

/// Seed the demo dataset and print the IDs needed to query it
pub async fn seed_demo(store: Arc<SqliteDatabase>) -> Result<()> {
    let admin = PlanAdminService::new(store);

    let mut exercise_ids = Vec::with_capacity(DEMO_EXERCISES.len());
    for (name, muscle_group, equipment) in DEMO_EXERCISES {
        let exercise = admin
            .upsert_exercise(Exercise {
                id: Uuid::new_v4(),
                name: name.to_owned(),
                muscle_group: Some(muscle_group.to_owned()),
                equipment: Some(equipment.to_owned()),
                video_url: None,
            })
            .await?;
        exercise_ids.push(exercise.id);
    }
    let [squat, goblet, bench, db_press, row, rdl, ohp, pull_up] = exercise_ids[..] else {
        anyhow::bail!("demo catalog size changed");
    };

    let lower_a = session(
        &admin,
        "Lower A",
        45,
        vec![
            item(squat, &[goblet], 4, TargetReps::Range { min: 6, max: 8 }, Some(60.0)),
            item(rdl, &[], 3, TargetReps::Range { min: 8, max: 10 }, Some(50.0)),
        ],
    )
    .await?;
    let upper_a = session(
        &admin,
        "Upper A",
        50,
        vec![
            item(bench, &[db_press], 4, TargetReps::Range { min: 8, max: 12 }, Some(40.0)),
            item(row, &[], 4, TargetReps::Range { min: 8, max: 12 }, Some(40.0)),
        ],
    )
    .await?;
    let lower_b = session(
        &admin,
        "Lower B",
        40,
        vec![
            item(rdl, &[], 4, TargetReps::Fixed(8), Some(60.0)),
            item(goblet, &[squat], 3, TargetReps::Range { min: 10, max: 12 }, Some(20.0)),
        ],
    )
    .await?;
    let upper_b = session(
        &admin,
        "Upper B",
        45,
        vec![
            item(ohp, &[db_press], 4, TargetReps::Range { min: 6, max: 10 }, Some(30.0)),
            item(pull_up, &[row], 3, TargetReps::Range { min: 5, max: 8 }, None),
        ],
    )
    .await?;

    let weeks = (1..=WEEKS_PER_PLAN)
        .map(|week_number| {
            let mut week = WeekTemplate::empty(week_number);
            week.days.mon.push(Placement::new(lower_a.id, 0));
            week.days.tue.push(Placement::new(upper_a.id, 0));
            week.days.thu.push(Placement::new(lower_b.id, 0));
            week.days.fri.push(Placement::new(upper_b.id, 0));
            week
        })
        .collect();
    let level = admin.create_level_template(DEMO_LEVEL_NAME, weeks).await?;

    let user_id = Uuid::new_v4();
    let start_at = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let subscription = admin
        .assign_subscription(AssignSubscriptionRequest {
            user_id,
            level_template_id: level.id,
            start_at,
            end_at: start_at + Duration::days(DAYS_PER_WEEK * i64::from(WEEKS_PER_PLAN)),
            auto_renew: false,
            admin_id: None,
            note: Some("Demo seed".to_owned()),
        })
        .await?;

    // Week 2: swap Friday's upper session for a second lower day
    let mut week_two = WeekOverride::inherit_all(2);
    *week_two.days.get_mut(DayKey::Fri) =
        DayOverride::from_placements(vec![Placement::new(lower_a.id, 0)]);
    admin.update_override_week(user_id, week_two).await?;

    info!(user_id = %user_id, level_template_id = %level.id, "Demo data seeded");
    print_json(&json!({
        "userId": user_id,
        "levelTemplateId": level.id,
        "subscriptionId": subscription.id,
        "sessions": {
            "lowerA": lower_a.id,
            "upperA": upper_a.id,
            "lowerB": lower_b.id,
            "upperB": upper_b.id,
        },
        "exercises": DEMO_EXERCISES
            .iter()
            .zip(&exercise_ids)
            .map(|((name, _, _), id)| json!({ "name": name, "id": id }))
            .collect::<Vec<_>>(),
    }))
}

async fn session(
    admin: &PlanAdminService<SqliteDatabase>,
    title: &str,
    duration_minutes: u32,
    items: Vec<SessionItem>,
) -> Result<SessionTemplate> {
    Ok(admin
        .upsert_session_template(SessionTemplate {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            difficulty: Some(Difficulty::Beginner),
            duration_minutes: Some(duration_minutes),
            items,
            updated_at: Utc::now(),
        })
        .await?)
}

fn item(
    exercise_id: Uuid,
    alternatives: &[Uuid],
    sets: u32,
    target_reps: TargetReps,
    starting_weight_kg: Option<f64>,
) -> SessionItem {
    SessionItem {
        exercise_id,
        alternatives: alternatives.to_vec(),
        sets,
        target_reps,
        rest_time_seconds: 90,
        recommended_starting_weight_kg: starting_weight_kg,
        progression_rules: Vec::new(),
    }
}
