use std::time::{Duration, Instant};

use judge::{ProcessSandbox, RunFailure, Sandbox, Toolchains};

use crate::support::{SH, SUM, leftover_workspaces, sandbox_config, sh_toolchains};

fn sandbox(work_dir: &std::path::Path) -> ProcessSandbox {
    ProcessSandbox::new(sh_toolchains(), &sandbox_config(work_dir, 2000, 1000))
}

mod run_stage {
    use super::*;

    #[tokio::test]
    async fn program_output_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let output = sandbox(dir.path()).run(SH, SUM, "3 5\n").await.unwrap();

        assert_eq!(output.stdout, "8\n");
        assert!(output.elapsed < Duration::from_secs(1));
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }

    #[tokio::test]
    async fn large_stdin_and_stdout_do_not_deadlock() {
        let dir = tempfile::tempdir().unwrap();
        let input: String = (0..100_000).map(|i| format!("line {i}\n")).collect();

        let output = sandbox(dir.path()).run(SH, "cat", &input).await.unwrap();
        assert_eq!(output.stdout, input);
    }

    #[tokio::test]
    async fn unread_stdin_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let input = "x".repeat(1 << 20);

        let output = sandbox(dir.path()).run(SH, "echo ok", &input).await.unwrap();
        assert_eq!(output.stdout.trim(), "ok");
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }

    #[tokio::test]
    async fn non_zero_exit_is_runtime_error_with_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let err = sandbox(dir.path())
            .run(SH, "echo partial\necho 'division by zero' >&2\nexit 1", "")
            .await
            .unwrap_err();

        assert_eq!(err, RunFailure::runtime("division by zero"));
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }

    #[tokio::test]
    async fn silent_crash_reports_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let err = sandbox(dir.path()).run(SH, "exit 7", "").await.unwrap_err();

        let RunFailure::RuntimeError { message } = err else {
            panic!("expected runtime error, got {err:?}");
        };
        assert!(message.contains('7'), "{message}");
    }

    #[tokio::test]
    async fn program_runs_inside_its_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let output = sandbox(dir.path())
            .run(SH, "echo data > scratch.txt\nls", "")
            .await
            .unwrap();

        assert!(output.stdout.contains("main.sh"));
        assert!(output.stdout.contains("scratch.txt"));
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }
}

mod timeouts {
    use super::*;

    #[tokio::test]
    async fn sleeping_program_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let started = Instant::now();
        let err = sandbox(dir.path()).run(SH, "sleep 30", "").await.unwrap_err();

        assert_eq!(err, RunFailure::ExecutionTimeout);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }

    #[tokio::test]
    async fn busy_loop_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let err = sandbox(dir.path())
            .run(SH, "while :; do :; done", "")
            .await
            .unwrap_err();

        assert_eq!(err, RunFailure::ExecutionTimeout);
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }

    #[tokio::test]
    async fn slow_compiler_is_compile_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = ProcessSandbox::new(sh_toolchains(), &sandbox_config(dir.path(), 300, 1000));
        let started = Instant::now();

        let err = sandbox.run("slow-compiler", SUM, "1 2\n").await.unwrap_err();
        assert_eq!(err, RunFailure::CompileTimeout);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }
}

mod leftovers {
    use super::*;

    #[tokio::test]
    async fn background_writer_leaves_no_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let program = "(i=0; while :; do i=$((i+1)); : > f$i; done) &\nsleep 0.2\necho 8";

        for _ in 0..3 {
            let output = sandbox(dir.path()).run(SH, program, "").await.unwrap();
            assert_eq!(output.stdout.trim(), "8");
        }
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }

    #[tokio::test]
    async fn background_child_does_not_outlive_run() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let marker = scratch.path().join("alive");
        let program = format!("(sleep 1; echo alive > '{}') &\necho 8", marker.display());

        let started = Instant::now();
        let output = sandbox(dir.path()).run(SH, &program, "").await.unwrap();
        assert_eq!(output.stdout.trim(), "8");
        assert!(started.elapsed() < Duration::from_millis(900));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists(), "background child survived the run");
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }

    #[tokio::test]
    async fn output_flood_is_cut_off() {
        let dir = tempfile::tempdir().unwrap();
        let config = judge::SandboxConfig {
            max_output_bytes: 64 * 1024,
            ..sandbox_config(dir.path(), 2000, 5000)
        };
        let started = Instant::now();

        let err = ProcessSandbox::new(sh_toolchains(), &config)
            .run(SH, "head -c 400000000 /dev/zero | tr '\\0' x", "")
            .await
            .unwrap_err();
        assert_eq!(err, RunFailure::runtime("Output limit exceeded"));
        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }
}

mod compile_stage {
    use super::*;

    #[tokio::test]
    async fn syntax_error_is_compile_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = sandbox(dir.path())
            .run(SH, "if true; then\necho unterminated\n", "")
            .await
            .unwrap_err();

        let RunFailure::CompileError { stderr } = err else {
            panic!("expected compile error, got {err:?}");
        };
        assert!(!stderr.trim().is_empty());
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }

    #[tokio::test]
    async fn unknown_language_spawns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = sandbox_config(dir.path(), 2000, 1000);
        let err = ProcessSandbox::new(Toolchains::default(), &config)
            .run("brainfuck", "+++", "")
            .await
            .unwrap_err();

        assert!(matches!(err, RunFailure::RuntimeError { .. }));
        assert_eq!(leftover_workspaces(dir.path()), 0);
    }
}
