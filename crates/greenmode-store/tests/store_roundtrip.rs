use std::fs;
use std::path::Path;

use greenmode_core::glob::GlobSynthesizer;
use greenmode_core::project::ProjectData;
use greenmode_store::{load_file_dict, snapshot, FsLister, ProjectDataFile, PROJECT_DATA_FILE};

fn touch(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

#[test]
fn snapshot_persist_reload_and_load_contents() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    touch(root, "main.py", "print(1)\n");
    touch(root, "src/a.py", "a = 1\nb = 2\n");
    touch(root, "src/b.pyc", "junk");

    let root_str = root.to_string_lossy().into_owned();
    let snap = snapshot(root, &["**.pyc".to_string()]).unwrap();
    let data = ProjectData::new(snap.dir_structure);

    let file = ProjectDataFile::new(root, PROJECT_DATA_FILE);
    file.write(&data).unwrap();
    let reloaded = file.read().unwrap();
    file.remove().unwrap();
    assert_eq!(reloaded, data);

    let names = reloaded.complete_filename_list(&root_str);
    assert_eq!(
        names,
        vec![format!("{root_str}/main.py"), format!("{root_str}/src/a.py")]
    );

    let dict = load_file_dict(&names).unwrap();
    assert_eq!(dict[&names[1]].len(), 2);
}

#[test]
fn fs_lister_drives_glob_synthesis() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    touch(root, "a.py", "");
    touch(root, "b.py", "");
    touch(root, "docs/readme.md", "");

    let root_str = root.to_string_lossy().into_owned();
    let files = vec![
        format!("{root_str}/a.py"),
        format!("{root_str}/b.py"),
        format!("{root_str}/docs/readme.md"),
    ];
    let lister = FsLister::default();
    let globs = GlobSynthesizer::new(&lister, 7, 0.9).synthesize(&files, &root_str);
    assert_eq!(globs.globs, vec![format!("{root_str}/**")]);
    assert!(globs.ignore.is_empty());
}

#[test]
fn hidden_file_left_out_of_the_green_set_is_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    touch(root, "a.py", "");
    touch(root, "b.py", "");
    touch(root, "c.py", "");
    touch(root, ".hidden.py", "");
    touch(root, ".git/HEAD", "");

    let root_str = root.to_string_lossy().into_owned();
    let green = vec![
        format!("{root_str}/a.py"),
        format!("{root_str}/b.py"),
        format!("{root_str}/c.py"),
    ];
    let lister = FsLister::new(vec![format!("{root_str}/.git/**")]);
    let globs = GlobSynthesizer::new(&lister, 7, 0.9).synthesize(&green, &root_str);
    assert_eq!(globs.globs, vec![format!("{root_str}/**")]);
    assert_eq!(globs.ignore, vec![format!("{root_str}/.hidden.py")]);
}
