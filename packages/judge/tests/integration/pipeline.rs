use common::event::topics;
use common::{EntityStore, SubmissionStatus, Verdict};
use judge::{Evaluator, ResubmissionPolicy};

use crate::support::{SH, SUM, SUM_CASES, SUM_CRASHES_ON_TWO, TestJudge};

mod verdicts {
    use super::*;

    #[tokio::test]
    async fn correct_program_is_accepted_and_scored() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("alice").await;
        let problem = judge.create_problem(100, SUM_CASES).await;

        let submission = judge.judge(user, problem, SUM).await;

        assert_eq!(submission.status, SubmissionStatus::Accepted);
        assert_eq!(submission.verdict, Some(Verdict::Accepted));
        assert!(submission.execution_time_ms.is_some());
        assert_eq!(submission.memory_used_kb, None);

        let user = judge.store.user(user).await.unwrap();
        assert_eq!(user.score, 100);
        assert_eq!(user.problems_solved, 1);
        assert_eq!(judge.store.problem(problem).await.unwrap().solved_count, 1);
        assert_eq!(judge.leftover_workspaces(), 0);
    }

    #[tokio::test]
    async fn crash_on_second_case_is_runtime_error() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("bob").await;
        let problem = judge.create_problem(100, SUM_CASES).await;

        let submission = judge.judge(user, problem, SUM_CRASHES_ON_TWO).await;

        assert_eq!(submission.verdict, Some(Verdict::RuntimeError));
        assert_eq!(submission.error.as_deref(), Some("boom: bad operand"));
        assert_eq!(judge.store.user(user).await.unwrap().score, 0);
        assert_eq!(judge.leftover_workspaces(), 0);
    }

    #[tokio::test]
    async fn crash_on_second_case_stops_after_one_pass() {
        let judge = TestJudge::spawn().await;
        let problem = judge.create_problem(100, SUM_CASES).await;
        let cases = judge.store.test_cases(problem).await.unwrap();

        let outcome = Evaluator::new(judge.sandbox.clone())
            .evaluate(&cases, SUM_CRASHES_ON_TWO, SH)
            .await;

        assert_eq!(outcome.verdict, Verdict::RuntimeError);
        assert_eq!(outcome.passed_tests, 1);
        assert_eq!(outcome.total_tests, 3);
    }

    #[tokio::test]
    async fn syntax_error_is_compilation_error() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("carol").await;
        let problem = judge.create_problem(100, SUM_CASES).await;

        let submission = judge.judge(user, problem, "read a b\nif then fi (\n").await;

        assert_eq!(submission.verdict, Some(Verdict::CompilationError));
        assert!(submission.error.is_some_and(|e| !e.trim().is_empty()));
        assert_eq!(judge.leftover_workspaces(), 0);
    }

    #[tokio::test]
    async fn sleeping_program_is_time_limit_exceeded() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("dave").await;
        let problem = judge.create_problem(100, SUM_CASES).await;

        let submission = judge.judge(user, problem, "sleep 30\n").await;

        assert_eq!(submission.verdict, Some(Verdict::TimeLimitExceeded));
        assert_eq!(submission.status, SubmissionStatus::TimeLimitExceeded);
        assert_eq!(judge.leftover_workspaces(), 0);
    }

    #[tokio::test]
    async fn wrong_output_records_first_mismatch() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("erin").await;
        let problem = judge.create_problem(100, SUM_CASES).await;

        let submission = judge
            .judge(user, problem, "read a b\necho $((a * b))\n")
            .await;

        // 1*1 == 1+1, so the second case is the first to differ.
        assert_eq!(submission.verdict, Some(Verdict::WrongAnswer));
        assert_eq!(submission.output.as_deref(), Some("4"));
        assert_eq!(submission.error, None);
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_ignored() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("frank").await;
        let problem = judge.create_problem(100, &[("", "8")]).await;

        let submission = judge.judge(user, problem, "printf '\\n  8  \\n\\n'\n").await;
        assert_eq!(submission.verdict, Some(Verdict::Accepted));

        let submission = judge.judge(user, problem, "echo 08\n").await;
        assert_eq!(submission.verdict, Some(Verdict::WrongAnswer));
    }

    #[tokio::test]
    async fn problem_without_cases_is_accepted() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("grace").await;
        let problem = judge.create_problem(100, &[]).await;

        let submission = judge.judge(user, problem, "exit 1\n").await;
        assert_eq!(submission.verdict, Some(Verdict::Accepted));
    }
}

mod notifications {
    use super::*;

    #[tokio::test]
    async fn lifecycle_topics_are_published_in_order() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("heidi").await;
        let problem = judge.create_problem(100, SUM_CASES).await;

        let submission = judge.judge(user, problem, SUM).await;

        assert_eq!(
            judge.publisher.topics().await,
            vec![
                topics::submission(submission.id),
                topics::submission(submission.id),
                topics::contest_submissions(1),
                topics::leaderboard(1),
            ]
        );
        let events = judge.publisher.events().await;
        assert_eq!(events[3].payload["user_id"], user);
        assert_eq!(events[3].payload["submission_id"], submission.id);
    }

    #[tokio::test]
    async fn rejected_submission_does_not_touch_leaderboard() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("ivan").await;
        let problem = judge.create_problem(100, SUM_CASES).await;

        judge.judge(user, problem, "sleep 30\n").await;

        let topics = judge.publisher.topics().await;
        assert_eq!(topics.len(), 3);
        assert!(!topics.contains(&topics::leaderboard(1)));
    }
}

mod scoring {
    use super::*;

    #[tokio::test]
    async fn concurrent_acceptances_are_all_counted() {
        let judge = TestJudge::spawn().await;
        let problem = judge.create_problem(10, SUM_CASES).await;
        let service = judge.service(4, 32);

        let mut users = Vec::new();
        for i in 0..8 {
            let user = judge.create_user(&format!("user{i}")).await;
            users.push(user);
            service
                .submit(judge.new_submission(user, problem, SUM))
                .await
                .unwrap();
        }
        service.shutdown().await;

        assert_eq!(judge.store.problem(problem).await.unwrap().solved_count, 8);
        for user in users {
            let user = judge.store.user(user).await.unwrap();
            assert_eq!(user.score, 10);
            assert_eq!(user.problems_solved, 1);
        }
        assert_eq!(judge.leftover_workspaces(), 0);
    }

    #[tokio::test]
    async fn same_user_concurrent_acceptances_are_all_counted() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("judy").await;
        let problem = judge.create_problem(25, SUM_CASES).await;
        let service = judge.service(4, 32);

        let mut ids = Vec::new();
        for _ in 0..6 {
            let submission = service
                .submit(judge.new_submission(user, problem, SUM))
                .await
                .unwrap();
            ids.push(submission.id);
        }
        service.shutdown().await;

        for id in ids {
            let submission = judge.store.submission(id).await.unwrap();
            assert_eq!(submission.status, SubmissionStatus::Accepted);
            assert!(submission.scored);
        }
        let user = judge.store.user(user).await.unwrap();
        assert_eq!(user.score, 150);
        assert_eq!(user.problems_solved, 6);
    }

    #[tokio::test]
    async fn first_acceptance_policy_credits_once() {
        let judge = TestJudge::with_policy(ResubmissionPolicy::FirstAcceptance).await;
        let user = judge.create_user("ken").await;
        let problem = judge.create_problem(25, SUM_CASES).await;

        for _ in 0..3 {
            let submission = judge.judge(user, problem, SUM).await;
            assert_eq!(submission.verdict, Some(Verdict::Accepted));
        }

        let user = judge.store.user(user).await.unwrap();
        assert_eq!(user.score, 25);
        assert_eq!(user.problems_solved, 1);
        assert_eq!(judge.store.problem(problem).await.unwrap().solved_count, 1);
    }

    #[tokio::test]
    async fn submissions_through_service_reach_terminal_state() {
        let judge = TestJudge::spawn().await;
        let user = judge.create_user("leo").await;
        let problem = judge.create_problem(10, SUM_CASES).await;
        let service = judge.service(2, 8);

        let codes = [SUM, SUM_CRASHES_ON_TWO, "sleep 30\n", "if then\n"];
        let mut ids = Vec::new();
        for code in codes {
            let submission = service
                .submit(judge.new_submission(user, problem, code))
                .await
                .unwrap();
            assert_eq!(submission.status, SubmissionStatus::Pending);
            ids.push(submission.id);
        }
        service.shutdown().await;

        let mut verdicts = Vec::new();
        for id in ids {
            verdicts.push(judge.store.submission(id).await.unwrap().verdict);
        }
        assert_eq!(
            verdicts,
            vec![
                Some(Verdict::Accepted),
                Some(Verdict::RuntimeError),
                Some(Verdict::TimeLimitExceeded),
                Some(Verdict::CompilationError),
            ]
        );
        assert_eq!(judge.leftover_workspaces(), 0);
    }
}
