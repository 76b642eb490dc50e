use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const HELLO_HASH: &str = "3fa0d4b98289a95a7cd3a45c9545e622718f8d2b";
const EMPTY_TREE_HASH: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

fn pit(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pit").unwrap();
    cmd.arg("-C").arg(dir).env_remove("PIT_LOG");
    cmd
}

fn init_repo() -> tempfile::TempDir {
    let temp = tempfile::tempdir().unwrap();
    pit(temp.path()).arg("init").assert().success();
    temp
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8(output.stdout).unwrap().trim_end().to_string()
}

#[test]
fn init_creates_layout() {
    let temp = tempfile::tempdir().unwrap();

    pit(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("initialized empty pit repository"));

    let pit_dir = temp.path().join(".pit");
    assert!(pit_dir.join("objects").is_dir());
    assert!(pit_dir.join("refs/heads").is_dir());
    assert!(pit_dir.join("config").is_file());

    // a second init refuses to clobber
    pit(temp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: repository already exists"));
}

#[test]
fn hash_object_without_repo() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("hello.txt"), "Hello, World\n").unwrap();

    pit(temp.path())
        .args(["hash-object", "hello.txt"])
        .assert()
        .success()
        .stdout(format!("{}\n", HELLO_HASH));

    pit(temp.path())
        .args(["hash-object", "--stdin"])
        .write_stdin("Hello, World\n")
        .assert()
        .success()
        .stdout(format!("{}\n", HELLO_HASH));

    assert!(!temp.path().join(".pit").exists());
}

#[test]
fn hash_object_write_then_cat_file() {
    let temp = init_repo();

    pit(temp.path())
        .args(["hash-object", "-w", "--stdin"])
        .write_stdin("Hello, World\n")
        .assert()
        .success()
        .stdout(format!("{}\n", HELLO_HASH));

    let object = temp
        .path()
        .join(".pit/objects/3f/a0d4b98289a95a7cd3a45c9545e622718f8d2b");
    assert!(object.is_file());

    pit(temp.path())
        .args(["cat-file", "-p", HELLO_HASH])
        .assert()
        .success()
        .stdout("Hello, World\n");

    pit(temp.path())
        .args(["cat-file", "-t", HELLO_HASH])
        .assert()
        .success()
        .stdout("blob\n");

    pit(temp.path())
        .args(["cat-file", "-s", HELLO_HASH])
        .assert()
        .success()
        .stdout("13\n");
}

#[test]
fn cat_file_mode_flags_are_exclusive() {
    let temp = init_repo();

    pit(temp.path())
        .args(["cat-file", "-p", "-t", HELLO_HASH])
        .assert()
        .failure();

    pit(temp.path())
        .args(["cat-file", "-t", "-s", HELLO_HASH])
        .assert()
        .failure();
}

#[test]
fn cat_file_defaults_to_pretty() {
    let temp = init_repo();

    pit(temp.path())
        .args(["hash-object", "-w", "--stdin"])
        .write_stdin("Hello, World\n")
        .assert()
        .success();

    pit(temp.path())
        .args(["cat-file", HELLO_HASH])
        .assert()
        .success()
        .stdout("Hello, World\n");
}

#[test]
fn cat_file_rejects_bad_and_missing_hashes() {
    let temp = init_repo();

    pit(temp.path())
        .args(["cat-file", "-p", "not-a-hash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid hash format"));

    pit(temp.path())
        .args(["cat-file", "-p", HELLO_HASH])
        .assert()
        .failure()
        .stderr(predicate::str::contains("object not found"));
}

#[test]
fn write_tree_and_list() {
    let temp = init_repo();
    fs::write(temp.path().join("file1.txt"), "Hello, World\n").unwrap();
    fs::create_dir(temp.path().join("dir1")).unwrap();

    let tree = stdout_of(pit(temp.path()).arg("write-tree"));
    assert_eq!(tree.len(), 40);

    pit(temp.path())
        .args(["cat-file", "-p", tree.as_str()])
        .assert()
        .success()
        .stdout(format!(
            "040000 tree {}\tdir1\n100644 blob {}\tfile1.txt\n",
            EMPTY_TREE_HASH, HELLO_HASH
        ));

    // unchanged content yields the same hash
    assert_eq!(stdout_of(pit(temp.path()).arg("write-tree")), tree);
}

#[test]
fn write_tree_from_subdirectory_uses_repo_root() {
    let temp = init_repo();
    fs::create_dir_all(temp.path().join("nested/deeper")).unwrap();
    fs::write(temp.path().join("top.txt"), "top").unwrap();

    let from_root = stdout_of(pit(temp.path()).arg("write-tree"));
    let from_nested = stdout_of(pit(&temp.path().join("nested/deeper")).arg("write-tree"));
    assert_eq!(from_root, from_nested);
}

#[test]
fn commit_tree_with_parent() {
    let temp = init_repo();
    fs::write(temp.path().join("file1.txt"), "Hello, World\n").unwrap();
    let tree = stdout_of(pit(temp.path()).arg("write-tree"));

    let first = stdout_of(pit(temp.path()).args([
        "commit-tree",
        tree.as_str(),
        "-m",
        "first",
        "--author-name",
        "Jane Doe",
        "--author-email",
        "jane@example.com",
    ]));

    pit(temp.path())
        .args(["cat-file", "-p", first.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("tree {}\n", tree)))
        .stdout(
            predicate::str::is_match(r"\nauthor Jane Doe <jane@example.com> \d+ [+-]\d{4}\n")
                .unwrap(),
        )
        .stdout(predicate::str::contains("committer Jane Doe <jane@example.com> "))
        .stdout(predicate::str::ends_with("\n\nfirst\n"));

    let second = stdout_of(pit(temp.path()).args([
        "commit-tree",
        tree.as_str(),
        "-p",
        first.as_str(),
        "-m",
        "second",
    ]));

    pit(temp.path())
        .args(["cat-file", "-p", second.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("parent {}\n", first)));

    pit(temp.path())
        .args(["cat-file", "-t", second.as_str()])
        .assert()
        .success()
        .stdout("commit\n");
}

#[test]
fn commit_tree_rejects_blob() {
    let temp = init_repo();

    pit(temp.path())
        .args(["hash-object", "-w", "--stdin"])
        .write_stdin("Hello, World\n")
        .assert()
        .success();

    pit(temp.path())
        .args(["commit-tree", HELLO_HASH, "-m", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected tree object"));
}

#[test]
fn fsck_reports_corruption() {
    let temp = init_repo();
    fs::write(temp.path().join("file1.txt"), "Hello, World\n").unwrap();
    pit(temp.path()).arg("write-tree").assert().success();

    pit(temp.path())
        .arg("fsck")
        .assert()
        .success()
        .stdout("checked 2 objects\n");

    // replace the blob with garbage
    let object = temp
        .path()
        .join(".pit/objects/3f/a0d4b98289a95a7cd3a45c9545e622718f8d2b");
    let mut perms = fs::metadata(&object).unwrap().permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(&object, perms).unwrap();
    fs::write(&object, b"garbage").unwrap();

    pit(temp.path())
        .arg("fsck")
        .assert()
        .failure()
        .stdout(predicate::str::contains(format!("corrupt {}", HELLO_HASH)));
}

#[test]
fn commands_outside_repo_fail() {
    let temp = tempfile::tempdir().unwrap();

    pit(temp.path())
        .arg("write-tree")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: repository not found"));
}
