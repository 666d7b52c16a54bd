use speculate2::speculate;

speculate! {
    use chrono::{NaiveDate, NaiveTime};
    use momentum_core::models::{ParentKind, Priority, ActivityStatus};
    use momentum_core::transform::{
        transform_goal, transform_routine, transform_sub_goal, WireGoal, WireRoutine, WireSubGoal,
    };
    use serde_json::json;

    fn sub_goal(value: serde_json::Value) -> WireSubGoal {
        serde_json::from_value(value).expect("valid sub-goal fixture")
    }

    describe "sub-goal transform" {
        it "renames snake_case fields and types dates and times" {
            let wire = sub_goal(json!({
                "id": 10,
                "title": "Morning run",
                "due_date": "2024-05-02",
                "start_time": "06:30:00",
                "end_time": "07:15",
                "duration": 45,
                "is_temporary": true,
                "priority": "HIGH"
            }));

            let node = transform_sub_goal(&wire);

            assert_eq!(node.due_date, NaiveDate::from_ymd_opt(2024, 5, 2));
            assert_eq!(node.start_time, NaiveTime::from_hms_opt(6, 30, 0));
            assert_eq!(node.end_time, NaiveTime::from_hms_opt(7, 15, 0));
            assert_eq!(node.duration, Some(45));
            assert_eq!(node.is_temporary, Some(true));
            assert_eq!(node.priority, Priority::High);

            let client = serde_json::to_value(&node).unwrap();
            assert!(client.get("startTime").is_some());
            assert!(client.get("dueDate").is_some());
            assert!(client.get("isTemporary").is_some());
            assert!(client.get("subGoals").is_some());
            assert!(client.get("start_time").is_none());
        }

        it "leaves missing optional fields absent and defaults priority to medium" {
            let node = transform_sub_goal(&sub_goal(json!({"id": 1, "title": "Bare"})));

            assert_eq!(node.description, None);
            assert_eq!(node.due_date, None);
            assert_eq!(node.start_time, None);
            assert_eq!(node.duration, None);
            assert_eq!(node.is_temporary, None);
            assert_eq!(node.parent, None);
            assert_eq!(node.priority, Priority::Medium);
        }

        it "treats an empty child list like an absent one" {
            let empty = transform_sub_goal(&sub_goal(json!({"id": 1, "title": "Leaf", "sub_goals": []})));
            let absent = transform_sub_goal(&sub_goal(json!({"id": 1, "title": "Leaf"})));

            assert_eq!(empty, absent);
            assert!(empty.sub_goals.is_empty());
            assert!(empty.is_leaf());
        }

        it "accepts children under either key, first non-empty wins" {
            let camel = transform_sub_goal(&sub_goal(json!({
                "id": 1, "title": "Parent",
                "sub_goals": [],
                "subGoals": [{"id": 2, "title": "Child"}]
            })));
            assert_eq!(camel.sub_goals.len(), 1);
            assert_eq!(camel.sub_goals[0].id, 2);

            let both = transform_sub_goal(&sub_goal(json!({
                "id": 1, "title": "Parent",
                "sub_goals": [{"id": 3, "title": "Snake"}],
                "subGoals": [{"id": 4, "title": "Camel"}]
            })));
            assert_eq!(both.sub_goals.len(), 1);
            assert_eq!(both.sub_goals[0].id, 3);
        }

        it "recurses through arbitrary depth" {
            let mut value = json!({"id": 6, "title": "depth 6"});
            for id in (1..6).rev() {
                value = json!({"id": id, "title": format!("depth {}", id), "sub_goals": [value]});
            }

            let mut node = &transform_sub_goal(&sub_goal(value));
            let mut depth = 1;
            while let Some(child) = node.sub_goals.first() {
                node = child;
                depth += 1;
            }
            assert_eq!(depth, 6);
            assert_eq!(node.id, 6);
        }

        it "resolves the polymorphic parent" {
            let nested = transform_sub_goal(&sub_goal(json!({
                "id": 5, "title": "n", "parent_id": 4, "parent_type": "App\\Models\\SubGoal"
            })));
            assert_eq!(nested.parent.map(|p| (p.id, p.kind)), Some((4, ParentKind::SubGoal)));

            let top = transform_sub_goal(&sub_goal(json!({
                "id": 5, "title": "t", "goal_id": 9, "parent_type": null
            })));
            assert_eq!(top.parent.map(|p| (p.id, p.kind)), Some((9, ParentKind::Goal)));
        }

        it "does not touch its input" {
            let wire = sub_goal(json!({"id": 1, "title": "x", "subGoals": [{"id": 2, "title": "y"}]}));
            let before = serde_json::to_value(&wire).unwrap();
            let _ = transform_sub_goal(&wire);
            assert_eq!(serde_json::to_value(&wire).unwrap(), before);
        }
    }

    describe "goal transform" {
        it "builds the whole tree" {
            let wire: WireGoal = serde_json::from_value(json!({
                "id": 1,
                "title": "Marathon",
                "color": "#ff0000",
                "progress": 40,
                "sub_goals": [
                    {"id": 2, "title": "Base", "subGoals": [{"id": 4, "title": "5k"}]},
                    {"id": 3, "title": "Taper"}
                ]
            })).unwrap();

            let goal = transform_goal(&wire);
            assert_eq!(goal.progress, 40);
            assert_eq!(goal.color.as_deref(), Some("#ff0000"));
            assert_eq!(goal.sub_goals.len(), 2);
            assert_eq!(goal.sub_goals[0].sub_goals[0].id, 4);
        }
    }

    describe "routine transform" {
        it "fills parent ids and activity status" {
            let wire: WireRoutine = serde_json::from_value(json!({
                "id": 1,
                "title": "Mornings",
                "sub_routines": [{
                    "id": 2,
                    "title": "Stretch",
                    "activities": [
                        {"id": 3, "title": "Neck", "status": "completed"},
                        {"id": 4, "title": "Back", "completed": 0},
                        {"id": 5, "title": "Legs", "completed": true}
                    ]
                }]
            })).unwrap();

            let routine = transform_routine(&wire);
            let sub_routine = &routine.sub_routines[0];
            assert_eq!(sub_routine.routine_id, 1);
            assert_eq!(sub_routine.activities[0].sub_routine_id, 2);

            let statuses: Vec<ActivityStatus> =
                sub_routine.activities.iter().map(|a| a.status).collect();
            assert_eq!(
                statuses,
                vec![ActivityStatus::Completed, ActivityStatus::Pending, ActivityStatus::Completed]
            );
        }
    }
}
