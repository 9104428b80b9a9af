//! Tests for `opskit fleet` against real git repositories.

use std::path::PathBuf;

use crate::skip_without_git;
use crate::support::repos::*;
use crate::support::*;

/// Fleet of working copies under `<dir>/fleet` with origins under `<home>/remotes`.
struct FleetEnv {
    t: Test,
    fleet: PathBuf,
    remotes: PathBuf,
}

impl FleetEnv {
    fn new(names: &[&str], blacklist: &[&str]) -> Self {
        let t = Test::new();
        let fleet = t.path("fleet");
        let remotes = t.home.path().join("remotes");
        std::fs::create_dir_all(&fleet).unwrap();
        for name in names {
            working_copy(&fleet, &remotes, name);
        }
        t.config(&fleet_config(&fleet, blacklist));
        Self { t, fleet, remotes }
    }

    fn repo(&self, name: &str) -> PathBuf {
        self.fleet.join(name)
    }
}

#[test]
fn test_status_lists_dirty_repositories() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a", "svc-b", "outdated.svc-c"], &[]);
    make_dirty(&env.repo("svc-b"));
    make_dirty(&env.repo("outdated.svc-c"));

    let output = env.t.run(&["fleet", "status"]);

    assert_success(&output);
    assert_stdout_contains(&output, "svc-b");
    assert_stdout_contains(&output, "README.md");
    assert_stdout_excludes(&output, "svc-a");
    assert_stdout_excludes(&output, "outdated.svc-c");
}

#[test]
fn test_status_all_clean() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a"], &[]);

    let output = env.t.run(&["fleet", "status"]);

    assert_success(&output);
    assert_stdout_contains(&output, "every repository is clean");
}

#[test]
fn test_branches_prints_current_branch() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a", "svc-b"], &[]);
    git(&env.repo("svc-b"), &["checkout", "-q", "-b", "feature"]);

    let output = env.t.run(&["fleet", "branches"]);

    assert_success(&output);
    let out = stdout(&output);
    assert!(out.lines().any(|l| l.contains("svc-a") && l.contains("master")));
    assert!(out.lines().any(|l| l.contains("svc-b") && l.contains("feature")));
}

#[test]
fn test_checkout_where_branch_exists_and_skips_dirty() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a", "svc-b", "svc-c"], &[]);
    git(&env.repo("svc-a"), &["branch", "feature"]);
    git(&env.repo("svc-c"), &["branch", "feature"]);
    make_dirty(&env.repo("svc-c"));

    let output = env.t.run(&["fleet", "checkout", "feature"]);

    assert_success(&output);
    assert_eq!(current_branch(&env.repo("svc-a")), "feature");
    assert_eq!(current_branch(&env.repo("svc-b")), "master");
    assert_eq!(current_branch(&env.repo("svc-c")), "master");
    assert_stdout_contains(&output, "Skipped - repo svc-c is dirty");
}

#[test]
fn test_checkout_honours_blacklist() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a", "legacy"], &["legacy"]);
    git(&env.repo("svc-a"), &["branch", "feature"]);
    git(&env.repo("legacy"), &["branch", "feature"]);

    let output = env.t.run(&["fleet", "checkout", "feature"]);

    assert_success(&output);
    assert_eq!(current_branch(&env.repo("svc-a")), "feature");
    assert_eq!(current_branch(&env.repo("legacy")), "master");
}

#[test]
fn test_delete_branch_switches_to_master_first() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a", "svc-b"], &[]);
    git(&env.repo("svc-a"), &["checkout", "-q", "-b", "feature"]);
    git(&env.repo("svc-b"), &["branch", "feature"]);

    let output = env.t.run(&["fleet", "delete-branch", "feature"]);

    assert_success(&output);
    assert_stdout_contains(&output, "svc-a: deleted (switched to master first)");
    assert_eq!(current_branch(&env.repo("svc-a")), "master");
    assert!(git(&env.repo("svc-a"), &["branch", "--list", "feature"]).is_empty());
    assert!(git(&env.repo("svc-b"), &["branch", "--list", "feature"]).is_empty());
}

#[test]
fn test_reset_discards_local_commits_except_listed() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a", "svc-b"], &[]);
    local_commit(&env.repo("svc-a"), "local a");
    local_commit(&env.repo("svc-b"), "local b");
    let kept = rev(&env.repo("svc-b"), "HEAD");

    let output = env.t.run(&["--yes", "fleet", "reset", "--except", "svc-b"]);

    assert_success(&output);
    let a = env.repo("svc-a");
    assert_eq!(rev(&a, "HEAD"), rev(&a, "origin/master"));
    assert_eq!(rev(&env.repo("svc-b"), "HEAD"), kept);
}

#[test]
fn test_reset_unknown_exception_resets_nothing() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a"], &[]);
    local_commit(&env.repo("svc-a"), "local a");
    let before = rev(&env.repo("svc-a"), "HEAD");

    let output = env.t.run(&["--yes", "fleet", "reset", "--except", "svc-a,nope"]);

    assert_failure(&output);
    assert_stderr_contains(&output, "not git repositories: nope");
    assert_eq!(rev(&env.repo("svc-a"), "HEAD"), before);
}

#[test]
fn test_reset_requires_confirmation() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a"], &[]);
    local_commit(&env.repo("svc-a"), "local a");
    let before = rev(&env.repo("svc-a"), "HEAD");

    let output = env.t.run_with_input(&["fleet", "reset"], "no\n");

    assert_failure(&output);
    assert_stderr_contains(&output, "aborted");
    assert_eq!(rev(&env.repo("svc-a"), "HEAD"), before);
}

#[test]
fn test_fetch_prunes_every_repository() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a"], &[]);

    let output = env.t.run(&["fleet", "fetch"]);

    assert_success(&output);
    assert_stdout_contains(&output, "svc-a: fetched");
}

#[cfg(unix)]
#[test]
fn test_clone_missing_repositories() {
    skip_without_git!();
    let env = FleetEnv::new(&["svc-a"], &["blocked"]);
    let fresh = bare_origin(&env.remotes, "svc-new");
    let blocked = bare_origin(&env.remotes, "blocked");
    let listing = format!(
        r#"[{{"name":"svc-a","sshUrl":"{a}"}},{{"name":"svc-new","sshUrl":"{new}"}},{{"name":"outdated-svc","sshUrl":"{new}"}},{{"name":"blocked","sshUrl":"{blocked}"}}]"#,
        a = env.remotes.join("svc-a.git").display(),
        new = fresh.display(),
        blocked = blocked.display(),
    );
    env.t.fake_tool("az", &format!("echo '{}'", listing));
    env.t.config(&format!(
        "{}organization = \"contoso\"\nproject = \"platform\"\n",
        fleet_config(&env.fleet, &["blocked"])
    ));

    let output = env.t.run(&["fleet", "clone"]);

    assert_success(&output);
    assert_stdout_contains(&output, "svc-new: cloned");
    assert!(env.repo("svc-new").join(".git").exists());
    assert!(!env.repo("outdated-svc").exists());
    assert!(!env.repo("blocked").exists());
}

#[test]
fn test_clone_requires_organization() {
    skip_without_git!();
    let env = FleetEnv::new(&[], &[]);

    let output = env.t.run(&["fleet", "clone"]);

    assert_failure(&output);
    assert_stderr_contains(&output, "fleet.organization");
}
