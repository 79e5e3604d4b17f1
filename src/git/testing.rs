use git2::{Repository, Signature};
use std::path::Path;

pub fn seed_bare_repository(path: &Path, branch: &str, files: &[(&str, &str)]) -> Repository {
    let repo = Repository::init_bare(path).expect("Failed to init bare repository");
    let reference = format!("refs/heads/{}", branch);

    {
        let mut builder = repo.treebuilder(None).expect("Failed to create tree");
        for (name, content) in files {
            let blob = repo.blob(content.as_bytes()).expect("Failed to write blob");
            builder
                .insert(name, blob, 0o100644)
                .expect("Failed to insert blob");
        }
        let tree_id = builder.write().expect("Failed to write tree");
        let tree = repo.find_tree(tree_id).expect("Failed to find tree");
        let signature =
            Signature::now("Test User", "test@example.com").expect("Failed to create signature");

        repo.commit(
            Some(&reference),
            &signature,
            &signature,
            "Initial commit",
            &tree,
            &[],
        )
        .expect("Failed to commit");
    }

    repo.set_head(&reference).expect("Failed to set HEAD");

    repo
}

pub fn read_file(repo: &Repository, branch: &str, path: &str) -> Option<Vec<u8>> {
    let object = repo.revparse_single(&format!("{}:{}", branch, path)).ok()?;
    let blob = object.peel_to_blob().ok()?;

    Some(blob.content().to_vec())
}

pub fn last_commit_message(repo: &Repository, branch: &str) -> String {
    repo.revparse_single(branch)
        .and_then(|object| object.peel_to_commit())
        .map(|commit| commit.message().unwrap_or_default().to_owned())
        .expect("Failed to read last commit")
}
