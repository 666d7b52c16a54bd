use speculate2::speculate;

speculate! {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use momentum::api::{ApiError, ApiResult};
    use momentum::sync::{sync_goal, sync_routine, ProgressSink};
    use momentum_core::models::{
        Activity, ActivityStatus, Goal, ParentKind, Priority, Routine, SubGoal, SubRoutine,
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Goal(u64, u8),
        SubGoal(u64, ParentKind, u8),
        SubRoutine(u64, u64, u8),
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<Call>>,
        fail_on: Option<u64>,
    }

    impl RecordingSink {
        fn failing_on(id: u64) -> Self {
            Self { fail_on: Some(id), ..Default::default() }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, id: u64, call: Call) -> ApiResult<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail_on == Some(id) {
                return Err(ApiError::Status { status: 500, body: String::new() });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ProgressSink for RecordingSink {
        async fn persist_goal_progress(&self, goal_id: u64, progress: u8) -> ApiResult<()> {
            self.record(goal_id, Call::Goal(goal_id, progress))
        }

        async fn persist_sub_goal_progress(
            &self,
            sub_goal_id: u64,
            parent: ParentKind,
            progress: u8,
        ) -> ApiResult<()> {
            self.record(sub_goal_id, Call::SubGoal(sub_goal_id, parent, progress))
        }

        async fn persist_sub_routine_progress(
            &self,
            routine_id: u64,
            sub_routine_id: u64,
            progress: u8,
        ) -> ApiResult<()> {
            self.record(sub_routine_id, Call::SubRoutine(routine_id, sub_routine_id, progress))
        }
    }

    fn leaf(id: u64, completed: bool) -> SubGoal {
        SubGoal {
            id,
            title: format!("sub-goal {}", id),
            description: None,
            completed,
            progress: if completed { 100 } else { 0 },
            due_date: None,
            start_time: None,
            end_time: None,
            duration: None,
            sub_goals: Vec::new(),
            priority: Priority::Medium,
            parent: None,
            is_temporary: None,
        }
    }

    fn branch(id: u64, children: Vec<SubGoal>) -> SubGoal {
        SubGoal { sub_goals: children, ..leaf(id, false) }
    }

    fn goal() -> Goal {
        Goal {
            id: 1,
            title: "Learn Rust".into(),
            description: None,
            color: None,
            icon: None,
            progress: 0,
            sub_goals: vec![
                branch(10, vec![leaf(11, true), leaf(12, false)]),
                leaf(20, false),
            ],
        }
    }

    fn routine() -> Routine {
        let activity = |id, done| Activity {
            id,
            sub_routine_id: 4,
            title: format!("activity {}", id),
            description: None,
            status: if done { ActivityStatus::Completed } else { ActivityStatus::Pending },
            scheduled_date: None,
            start_time: None,
            end_time: None,
            duration: None,
            priority: Priority::Medium,
        };
        Routine {
            id: 3,
            title: "Mornings".into(),
            description: None,
            color: None,
            icon: None,
            progress: 0,
            sub_routines: vec![SubRoutine {
                id: 4,
                routine_id: 3,
                title: "Stretch".into(),
                description: None,
                progress: 0,
                activities: vec![activity(5, true), activity(6, false)],
            }],
        }
    }

    describe "sync_goal" {
        it "persists each changed node once, goal last" {
            let sink = RecordingSink::default();
            let mut goal = goal();

            let report = tokio_test::block_on(sync_goal(&mut goal, &sink));

            assert_eq!(report.failed, 0);
            assert_eq!(
                sink.calls(),
                vec![
                    Call::SubGoal(10, ParentKind::Goal, 50),
                    Call::Goal(1, 33),
                ]
            );
            assert_eq!(goal.progress, 33);
        }

        it "does nothing when the tree is already consistent" {
            let sink = RecordingSink::default();
            let mut goal = goal();
            tokio_test::block_on(sync_goal(&mut goal, &sink));

            let again = RecordingSink::default();
            let report = tokio_test::block_on(sync_goal(&mut goal, &again));

            assert!(report.changes.is_empty());
            assert!(again.calls().is_empty());
        }

        it "keeps the recomputed value when a write fails" {
            let sink = RecordingSink::failing_on(10);
            let mut goal = goal();

            let report = tokio_test::block_on(sync_goal(&mut goal, &sink));

            assert_eq!(report.failed, 1);
            assert_eq!(sink.calls().len(), 2);
            assert_eq!(goal.find_sub_goal(10).map(|sg| sg.progress), Some(50));
            assert_eq!(goal.progress, 33);
        }

        it "reports completion of the last leaf as 100" {
            let sink = RecordingSink::default();
            let mut goal = goal();
            tokio_test::block_on(sync_goal(&mut goal, &sink));

            goal.set_completed(12, true);
            goal.set_completed(20, true);
            tokio_test::block_on(sync_goal(&mut goal, &sink));

            assert_eq!(goal.progress, 100);
            assert_eq!(sink.calls().last(), Some(&Call::Goal(1, 100)));
        }
    }

    describe "sync_routine" {
        it "writes back sub-routine progress only" {
            let sink = RecordingSink::default();
            let mut routine = routine();

            let report = tokio_test::block_on(sync_routine(&mut routine, &sink));

            assert_eq!(report.failed, 0);
            assert_eq!(sink.calls(), vec![Call::SubRoutine(3, 4, 50)]);
            assert_eq!(routine.progress, 50);
        }

        it "follows an activity status change" {
            let sink = RecordingSink::default();
            let mut routine = routine();
            tokio_test::block_on(sync_routine(&mut routine, &sink));

            assert!(routine.set_activity_status(4, 6, ActivityStatus::Completed));
            tokio_test::block_on(sync_routine(&mut routine, &sink));

            assert_eq!(sink.calls().last(), Some(&Call::SubRoutine(3, 4, 100)));
            assert_eq!(routine.progress, 100);
        }
    }
}
