use pretty_assertions::assert_eq;
use schemac_codegen::{write_output, Target};
use schemac_core::Schema;
use std::{fs, path::Path};

const SRC: &str = "\
Table Groups {
  id UUID [pk]
  name TEXT [unique]
  tags TEXT[]
}
Table Users {
  id UUID [pk]
  group_id UUID
  mentor_id UUID
  status Status
}
Table Sessions { token TEXT; user_id UUID }
Enum Status {
  ACTIVE Active
  BANNED
}
Protocol Named {
  name TEXT
}
Model Profile extends Named {
  id;UUID;NOFORM
  name;TEXT;Name
}
FK Users.group_id -> Groups.id [many_to_one] [refer_left]
FK Users.mentor_id as mentor -> Users.id as mentees [refer_right]
FK Sessions.user_id -> Users.id [one_to_one]
";

fn run(dir: &Path) {
    let schema = Schema::parse(SRC).unwrap();

    for kind in Target::All.kinds() {
        let emitter = kind.emitter();
        let output = emitter.emit(&schema).unwrap();
        write_output(emitter.name(), &output, &dir.join(emitter.name())).unwrap();
    }
}

fn snapshot(dir: &Path) -> Vec<(String, String)> {
    let mut files = vec![];
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(snapshot(&path));
        } else {
            let contents = fs::read_to_string(&path).unwrap();
            files.push((path.display().to_string(), contents));
        }
    }
    files.sort();
    files
}

#[test]
fn emitting_twice_is_identical() {
    let a = Schema::parse(SRC).unwrap();
    let b = Schema::parse(SRC).unwrap();

    for kind in Target::All.kinds() {
        let first = kind.emitter().emit(&a).unwrap();
        let second = kind.emitter().emit(&b).unwrap();
        assert_eq!(first.files, second.files, "{kind}");
    }
}

#[test]
fn rerun_overwrites_in_place() {
    let dir = tempfile::tempdir().unwrap();

    run(dir.path());
    let first = snapshot(dir.path());

    run(dir.path());
    let second = snapshot(dir.path());

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn each_emitter_gets_its_own_directory() {
    let dir = tempfile::tempdir().unwrap();
    run(dir.path());

    for name in [
        "persistence",
        "transfer",
        "client-model",
        "view-model",
        "endpoint",
        "protocol",
    ] {
        assert!(dir.path().join(name).is_dir(), "{name}");
    }

    assert!(dir.path().join("persistence/UsersModel.py").is_file());
    assert!(dir.path().join("endpoint/UsersEndpoint.swift").is_file());
    assert!(!dir.path().join("endpoint/SessionsEndpoint.swift").exists());
    assert!(dir.path().join("protocol/NamedFactory.swift").is_file());
}
