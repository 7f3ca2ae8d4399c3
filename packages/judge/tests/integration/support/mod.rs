use std::path::Path;
use std::sync::Arc;

use common::entity::{NewProblem, NewSubmission, NewTestCase, NewUser, Submission};
use common::{EntityStore, MemoryPublisher, MemoryStore};
use judge::{
    JudgeCoordinator, JudgePool, ProcessSandbox, ResubmissionPolicy, SandboxConfig,
    SubmissionService, Toolchain, Toolchains,
};
use tempfile::TempDir;

/// Language id of the shell toolchain used throughout these tests.
pub const SH: &str = "sh";

/// `sh -n` syntax-checks the script as the compile stage, `sh` runs it.
pub fn sh_toolchains() -> Toolchains {
    let mut toolchains = Toolchains::empty();
    toolchains
        .register(
            SH,
            Toolchain::compiled("main.sh", &["sh", "-n", "main.sh"], &["sh", "main.sh"]),
        )
        .register(
            "slow-compiler",
            Toolchain::compiled("main.sh", &["sleep", "30"], &["sh", "main.sh"]),
        );
    toolchains
}

pub fn sandbox_config(
    work_dir: &Path,
    compile_timeout_ms: u64,
    execution_timeout_ms: u64,
) -> SandboxConfig {
    SandboxConfig {
        work_dir: Some(work_dir.to_path_buf()),
        compile_timeout_ms,
        execution_timeout_ms,
        ..SandboxConfig::default()
    }
}

/// Number of entries left in a sandbox work directory.
pub fn leftover_workspaces(work_dir: &Path) -> usize {
    std::fs::read_dir(work_dir).map(|dir| dir.count()).unwrap_or(0)
}

/// A judging engine over an in-memory store, a recording publisher, and a real
/// process sandbox rooted in a temporary directory.
pub struct TestJudge {
    pub store: Arc<MemoryStore>,
    pub publisher: MemoryPublisher,
    pub sandbox: Arc<ProcessSandbox>,
    pub coordinator: Arc<JudgeCoordinator>,
    pub work_dir: TempDir,
}

impl TestJudge {
    pub async fn spawn() -> Self {
        Self::with_policy(ResubmissionPolicy::EveryAcceptance).await
    }

    pub async fn with_policy(policy: ResubmissionPolicy) -> Self {
        let work_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let publisher = MemoryPublisher::new();
        let sandbox = Arc::new(ProcessSandbox::new(
            sh_toolchains(),
            &sandbox_config(work_dir.path(), 2000, 1000),
        ));
        let coordinator = Arc::new(JudgeCoordinator::new(
            store.clone(),
            sandbox.clone(),
            Arc::new(publisher.clone()),
            policy,
        ));

        Self {
            store,
            publisher,
            sandbox,
            coordinator,
            work_dir,
        }
    }

    pub async fn create_user(&self, username: &str) -> i32 {
        self.store
            .insert_user(NewUser {
                username: username.into(),
                full_name: None,
            })
            .await
            .unwrap()
            .id
    }

    pub async fn create_problem(&self, points: i32, cases: &[(&str, &str)]) -> i32 {
        let problem = self
            .store
            .insert_problem(NewProblem {
                contest_id: 1,
                title: "A + B".into(),
                difficulty: Default::default(),
                points,
            })
            .await
            .unwrap();
        for (input, expected) in cases {
            self.store
                .insert_test_case(NewTestCase {
                    problem_id: problem.id,
                    input: input.to_string(),
                    expected_output: expected.to_string(),
                    is_hidden: false,
                })
                .await
                .unwrap();
        }
        problem.id
    }

    pub fn new_submission(&self, user_id: i32, problem_id: i32, code: &str) -> NewSubmission {
        NewSubmission {
            user_id,
            problem_id,
            contest_id: 1,
            code: code.into(),
            language: Some(SH.into()),
        }
    }

    /// Persist a submission and judge it synchronously.
    pub async fn judge(&self, user_id: i32, problem_id: i32, code: &str) -> Submission {
        let submission = self
            .store
            .insert_submission(self.new_submission(user_id, problem_id, code))
            .await
            .unwrap();
        self.coordinator.judge(submission.id).await.unwrap()
    }

    pub fn service(&self, pool_size: usize, queue_capacity: usize) -> SubmissionService {
        let pool = JudgePool::start(self.coordinator.clone(), pool_size, queue_capacity);
        SubmissionService::new(self.store.clone(), pool)
    }

    pub fn leftover_workspaces(&self) -> usize {
        leftover_workspaces(self.work_dir.path())
    }
}

/// Reads two integers per line and prints their sum.
pub const SUM: &str = "read a b\necho $((a + b))\n";

/// Like [`SUM`], but dies with a message on stderr when the first operand is 2.
pub const SUM_CRASHES_ON_TWO: &str = r#"read a b
if [ "$a" -eq 2 ]; then
  echo "boom: bad operand" >&2
  exit 3
fi
echo $((a + b))
"#;

pub const SUM_CASES: &[(&str, &str)] = &[("1 1\n", "2"), ("2 2\n", "4"), ("3 3\n", "6")];
