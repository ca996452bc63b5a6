//! Built-in level content.

use crate::catalog::Level;

/// Value printed by `echo $SECRET_KEY`.
pub const SECRET_KEY_VALUE: &str = "bandit9{EnvVariableMaster}";

struct LevelSeed<'a> {
    title: &'a str,
    description: &'a str,
    welcome: &'a str,
    hint: &'a str,
    solution: &'a str,
    files: &'a [(&'a str, &'a str)],
}

impl LevelSeed<'_> {
    fn build(&self, index: usize) -> Level {
        Level {
            index,
            title: self.title.to_string(),
            description: self.description.to_string(),
            welcome: self.welcome.to_string(),
            hint: self.hint.to_string(),
            solution: self.solution.to_string(),
            files: self
                .files
                .iter()
                .map(|(path, content)| ((*path).to_string(), (*content).to_string()))
                .collect(),
        }
    }
}

const GREP_LOG: &str = "Server started
User login: admin
Error: connection timeout
Password: bandit6{GrepNinja2024}
Debug: memory allocation
Warning: disk space low
Info: backup completed
Error: null pointer exception
User logout: admin
Server stopped";

const SEEDS: &[LevelSeed<'static>] = &[
    LevelSeed {
        title: "The Beginning",
        description: "The password for the next level is stored in a file called readme",
        welcome: "Welcome to CodeHeist! Your first mission is to find the password in the readme file.",
        hint: "Try using 'ls' to see files, then 'cat readme' to read it",
        solution: "bandit1{NH2SXQwcBdpmTEzi3bvBHMM9H66vVXjL}",
        files: &[("readme", "bandit1{NH2SXQwcBdpmTEzi3bvBHMM9H66vVXjL}")],
    },
    LevelSeed {
        title: "The Dash File",
        description: "The password for the next level is stored in a file called -",
        welcome: "Good job! Now find the password in a file named with just a dash.",
        hint: "Files with special names need special handling. Try 'cat ./-' or 'cat -- -'",
        solution: "bandit2{rRGizSaX8Mk1RTb1CNQoXTcYZWU6lgzi}",
        files: &[
            ("-", "bandit2{rRGizSaX8Mk1RTb1CNQoXTcYZWU6lgzi}"),
            (
                "readme",
                "This is a decoy file. The real password is in the file named '-'",
            ),
        ],
    },
    LevelSeed {
        title: "Spaces in Filename",
        description: "The password is in a file with spaces in its name",
        welcome: "Now dealing with filenames that contain spaces.",
        hint: "Use quotes around filenames with spaces: 'cat \"file with spaces.txt\"'",
        solution: "bandit3{6zPeziLdR2RKNdNYFNb6nVCKzphlXHBM}",
        files: &[
            ("file with spaces.txt", "bandit3{6zPeziLdR2RKNdNYFNb6nVCKzphlXHBM}"),
            ("normal_file.txt", "This is not the password file"),
        ],
    },
    LevelSeed {
        title: "Hidden Files",
        description: "The password is stored in a hidden file",
        welcome: "Some files are hidden from normal view. Can you find them?",
        hint: "Hidden files start with a dot. Use 'ls -a' to see all files",
        solution: "bandit4{UV1B0aH0fUHJ6dGVyIFN0cm9uZ1Bhc3N3MHJk}",
        files: &[
            (".hidden", "bandit4{UV1B0aH0fUHJ6dGVyIFN0cm9uZ1Bhc3N3MHJk}"),
            ("visible.txt", "This file is visible but not useful"),
        ],
    },
    LevelSeed {
        title: "File Permissions",
        description: "The password is in a file you don't have permission to read",
        welcome: "Sometimes files are protected. You need the right permissions to access them.",
        hint: "Some files need permission changes. Use 'chmod' to modify file permissions.",
        solution: "bandit5{FilePermissionMaster2024}",
        files: &[
            ("secret.txt", "bandit5{FilePermissionMaster2024}"),
            ("readable.txt", "This file is readable but not helpful"),
            (".permissions", "Try: chmod 700 secret.txt"),
        ],
    },
    LevelSeed {
        title: "Grep Master",
        description: "Find the password hidden in a large text file",
        welcome: "Now you need to search through content. The password is somewhere in a large file.",
        hint: "Use 'grep' to search for patterns in files. Try: grep Password data.log",
        solution: "bandit6{GrepNinja2024}",
        files: &[
            ("data.log", GREP_LOG),
            (
                "notes.txt",
                "The log file contains important information among all the noise.",
            ),
        ],
    },
    LevelSeed {
        title: "Binary Detective",
        description: "Extract text from a binary file",
        welcome: "Some files aren't plain text. You'll need special tools to extract readable content.",
        hint: "Use 'strings' command to extract readable text from binary files.",
        solution: "bandit7{BinaryHunter}",
        files: &[
            (
                "binary.data",
                "← Binary data → bandit7{BinaryHunter} ← More binary data →",
            ),
            ("hint.txt", "Sometimes binary files contain readable strings..."),
        ],
    },
    LevelSeed {
        title: "The Maze of Directories",
        description: "Find the password hidden deep in directory structures",
        welcome: "The filesystem can be complex. Navigate through directories to find what you need.",
        hint: "Use 'find' command to search through directories recursively.",
        solution: "bandit8{DirectoryExplorer}",
        files: &[
            ("dir1/file1.txt", "Not here"),
            ("dir1/dir2/notes.txt", "Keep looking"),
            ("dir1/dir2/dir3/secret", "bandit8{DirectoryExplorer}"),
            ("dir1/decoy.txt", "Wrong path"),
            ("dir4/another.txt", "Dead end"),
        ],
    },
    LevelSeed {
        title: "Environment Secrets",
        description: "The password is stored in an environment variable",
        welcome: "Systems often store secrets in environment variables. Can you find them?",
        hint: "Use 'echo' to display environment variables. The password might be in a variable.",
        solution: SECRET_KEY_VALUE,
        files: &[
            ("config.txt", "SECRET_KEY=bandit9{EnvVariableMaster}"),
            ("script.sh", "#!/bin/bash\necho $SECRET_KEY"),
            ("readme.md", "Check the environment variables..."),
        ],
    },
    LevelSeed {
        title: "The Encoded Secret",
        description: "Decode a base64 encoded password",
        welcome: "Sometimes secrets are encoded to hide them in plain sight. Can you decode it?",
        hint: "Use 'base64 -d' to decode base64 encoded text.",
        solution: "bandit10{Base64DecoderAwesome}",
        files: &[
            ("encoded.txt", "YmFuZGl0MTB7QmFzZTY0RGVjb2RlckF3ZXNvbWV9"),
            ("hint.txt", "This looks like base64 encoding..."),
        ],
    },
];

pub(crate) fn builtin_levels() -> Vec<Level> {
    SEEDS
        .iter()
        .enumerate()
        .map(|(index, seed)| seed.build(index))
        .collect()
}
