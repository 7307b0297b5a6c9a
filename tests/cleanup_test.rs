use std::cell::RefCell;
use std::path::Path;
use tempfile::TempDir;

use host_cleanup::cleaner::{HostCleanup, RemovalResult};
use host_cleanup::common::config::HostLayout;
use host_cleanup::common::errors::CleanupError;
use host_cleanup::manifest::{CleanupManifest, Section, SkipSet};
use host_cleanup::system::{CommandOutput, CommandRunner, CommandSpec, OsFamily, UserResolver};

/// Records every command in order and reports success
#[derive(Default)]
struct RecordingRunner {
    calls: RefCell<Vec<String>>,
}

impl RecordingRunner {
    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CleanupError> {
        self.calls.borrow_mut().push(command.to_string());
        Ok(CommandOutput::default())
    }
}

/// Resolves every user to a fixed uid
struct FixedUid(u32);

impl UserResolver for FixedUid {
    fn resolve_uids(&self, users: &[String]) -> Vec<u32> {
        users.iter().filter(|u| !u.is_empty()).map(|_| self.0).collect()
    }
}

fn layout_in(dir: &Path) -> HostLayout {
    HostLayout {
        owned_file_folders: vec![dir.join("owned")],
        additional_dir_roots: vec![dir.join("tmp")],
        additional_dir_prefixes: vec!["hadoop-".to_string(), "hsperfdata_".to_string()],
        select_marker: dir.join("hdp-select-set-all.performed"),
        rhel_repo_dir: dir.join("yum.repos.d"),
        suse_repo_dir: dir.join("zypp.repos.d"),
    }
}

// ─── Ordering ─────────────────────────────────────────────────────────────────

#[test]
fn test_end_to_end_command_order() {
    let tmp = TempDir::new().unwrap();
    let runner = RecordingRunner::default();
    let resolver = FixedUid(u32::MAX - 1);
    let cleanup = HostCleanup::new(
        &runner,
        &resolver,
        OsFamily::Redhat,
        layout_in(tmp.path()),
    );

    let manifest = CleanupManifest::parse(
        "[packages]\npkg_list = foo\n[users]\nusr_list = bar\n[processes]\nproc_list = 1234\n",
    )
    .unwrap();
    let report = cleanup.run(&manifest, &SkipSet::new());

    assert_eq!(
        runner.calls(),
        vec![
            "kill -9 1234",
            "yum erase -y foo",
            "userdel -rf bar",
            "groupdel hadoop",
        ]
    );
    assert_eq!(report.failed(), 0);
    let sections: Vec<Section> = report.records.iter().map(|r| r.section).collect();
    assert_eq!(
        sections,
        vec![Section::Processes, Section::Packages, Section::Users, Section::Users]
    );
}

#[test]
fn test_full_manifest_touches_filesystem_in_order() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let layout = layout_in(root);

    std::fs::create_dir_all(root.join("home/hdfs")).unwrap();
    std::fs::create_dir_all(root.join("etc/hadoop")).unwrap();
    std::fs::create_dir_all(root.join("tmp/hadoop-hdfs")).unwrap();
    std::fs::create_dir_all(root.join("tmp/keep-me")).unwrap();
    std::fs::create_dir_all(&layout.rhel_repo_dir).unwrap();
    std::fs::write(layout.rhel_repo_dir.join("hdp.repo"), "[HDP]\nbaseurl=http://x\n").unwrap();
    std::fs::write(layout.rhel_repo_dir.join("ambari.repo"), "[HDP]\n").unwrap();
    std::fs::write(&layout.select_marker, "").unwrap();

    let text = format!(
        "[packages]\npkg_list = hadoop,ambari-agent\n\
         [users]\nusr_list = hdfs\nusr_homedir_list = {home}\n\
         [directories]\ndir_list = {etc}\n\
         [repositories]\nrepo_list = HDP\n",
        home = root.join("home/hdfs").display(),
        etc = root.join("etc/hadoop").display(),
    );
    let manifest = CleanupManifest::parse(&text).unwrap();

    let runner = RecordingRunner::default();
    let resolver = FixedUid(u32::MAX - 1);
    let cleanup = HostCleanup::new(&runner, &resolver, OsFamily::Redhat, layout.clone());
    let report = cleanup.run(&manifest, &SkipSet::new());

    assert_eq!(
        runner.calls(),
        vec!["yum erase -y hadoop", "userdel -rf hdfs", "groupdel hadoop"]
    );
    assert!(!layout.select_marker.exists());
    assert!(!root.join("home/hdfs").exists());
    assert!(!root.join("etc/hadoop").exists());
    assert!(!root.join("tmp/hadoop-hdfs").exists());
    assert!(root.join("tmp/keep-me").exists());
    assert!(!layout.rhel_repo_dir.join("hdp.repo").exists());
    assert!(layout.rhel_repo_dir.join("ambari.repo").exists());
    assert!(report.records.iter().all(|r| r.result == RemovalResult::Success));

    let order: Vec<Section> = report.records.iter().map(|r| r.section).collect();
    let first = |s: Section| order.iter().position(|x| *x == s).unwrap();
    assert!(first(Section::Packages) < first(Section::Users));
    assert!(first(Section::Users) < first(Section::UsrHomedir));
    assert!(first(Section::UsrHomedir) < first(Section::Directories));
    assert!(first(Section::Directories) < first(Section::AdditionalDirectories));
    assert!(first(Section::AdditionalDirectories) < first(Section::Repositories));
}

// ─── Skip set & absent sections ───────────────────────────────────────────────

#[test]
fn test_absent_sections_run_no_commands() {
    let tmp = TempDir::new().unwrap();
    let runner = RecordingRunner::default();
    let resolver = FixedUid(0);
    let cleanup = HostCleanup::new(&runner, &resolver, OsFamily::Suse, layout_in(tmp.path()));

    let report = cleanup.run(&CleanupManifest::default(), &SkipSet::new());
    assert!(runner.calls().is_empty());
    assert!(report.records.is_empty());
}

#[test]
fn test_skipped_sections_take_no_action() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    std::fs::create_dir_all(root.join("data")).unwrap();
    std::fs::create_dir_all(root.join("tmp/hsperfdata_hdfs")).unwrap();

    let text = format!(
        "[packages]\npkg_list = foo\n[users]\nusr_list = bar\n[processes]\nproc_list = 1\n\
         [directories]\ndir_list = {}\n[alternatives]\nsymlink_list = hadoop-conf\n",
        root.join("data").display()
    );
    let manifest = CleanupManifest::parse(&text).unwrap();
    let skip: SkipSet = [
        Section::Packages,
        Section::Users,
        Section::Processes,
        Section::Directories,
        Section::AdditionalDirectories,
        Section::Alternatives,
    ]
    .into_iter()
    .collect();

    let runner = RecordingRunner::default();
    let resolver = FixedUid(0);
    let cleanup = HostCleanup::new(&runner, &resolver, OsFamily::Redhat, layout_in(root));
    let report = cleanup.run(&manifest, &skip);

    assert!(runner.calls().is_empty());
    assert!(report.records.is_empty());
    assert!(root.join("data").exists());
    assert!(root.join("tmp/hsperfdata_hdfs").exists());
}

#[test]
fn test_skipping_one_section_leaves_the_rest() {
    let tmp = TempDir::new().unwrap();
    let manifest = CleanupManifest::parse(
        "[packages]\npkg_list = foo\n[users]\nusr_list = bar\n[processes]\nproc_list = 1234\n",
    )
    .unwrap();
    let skip: SkipSet = [Section::Users].into_iter().collect();

    let runner = RecordingRunner::default();
    let resolver = FixedUid(0);
    let cleanup = HostCleanup::new(&runner, &resolver, OsFamily::Debian, layout_in(tmp.path()));
    cleanup.run(&manifest, &skip);

    assert_eq!(
        runner.calls(),
        vec!["kill -9 1234", "/usr/bin/apt-get -y -q remove foo"]
    );
}

#[test]
fn test_skipping_home_dirs_keeps_user_deletion() {
    let tmp = TempDir::new().unwrap();
    let home = tmp.path().join("home/hdfs");
    std::fs::create_dir_all(&home).unwrap();
    let manifest = CleanupManifest::parse(&format!(
        "[users]\nusr_list = hdfs\nusr_homedir_list = {}\n",
        home.display()
    ))
    .unwrap();
    let skip: SkipSet = [Section::UsrHomedir].into_iter().collect();

    let runner = RecordingRunner::default();
    let resolver = FixedUid(0);
    let cleanup = HostCleanup::new(&runner, &resolver, OsFamily::Redhat, layout_in(tmp.path()));
    cleanup.run(&manifest, &skip);

    assert_eq!(runner.calls(), vec!["userdel -rf hdfs", "groupdel hadoop"]);
    assert!(home.exists());
}

// ─── Owned-file sweep ─────────────────────────────────────────────────────────

#[cfg(unix)]
#[test]
fn test_owned_file_sweep_uses_resolved_uids() {
    use std::os::unix::fs::MetadataExt;

    let tmp = TempDir::new().unwrap();
    let owned = tmp.path().join("owned");
    std::fs::create_dir_all(owned.join("hadoop-hdfs-datanode.pid.d")).unwrap();
    std::fs::write(owned.join("yarn.lock"), "").unwrap();
    let my_uid = std::fs::metadata(&owned).unwrap().uid();

    let manifest = CleanupManifest::parse("[users]\nusr_list = hdfs\n").unwrap();
    let runner = RecordingRunner::default();

    // A uid that owns nothing leaves the folder intact
    let stranger = FixedUid(my_uid.wrapping_add(777));
    let cleanup = HostCleanup::new(&runner, &stranger, OsFamily::Redhat, layout_in(tmp.path()));
    cleanup.run(&manifest, &SkipSet::new());
    assert!(owned.join("yarn.lock").exists());

    let owner = FixedUid(my_uid);
    let cleanup = HostCleanup::new(&runner, &owner, OsFamily::Redhat, layout_in(tmp.path()));
    let report = cleanup.run(&manifest, &SkipSet::new());
    assert!(!owned.join("yarn.lock").exists());
    assert!(!owned.join("hadoop-hdfs-datanode.pid.d").exists());
    assert!(owned.exists());
    assert_eq!(report.for_section(Section::Users).count(), 4);
}
