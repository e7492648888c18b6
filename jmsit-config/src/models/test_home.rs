//! Built-in registry for a qpid-interop-test checkout.
//!
//! Shim locations are fixed relative to `$QPID_INTEROP_TEST_HOME`; the Qpid
//! JMS classpath is read from `shims/qpid-jms/cp.txt`, produced by the Maven
//! build of that shim.

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::registry::{ShimConfig, ShimRegistryConfig};

pub const TEST_HOME_ENV: &str = "QPID_INTEROP_TEST_HOME";

const QPID_JMS_SENDER: &str = "org.apache.qpid.interop_test.shim.JmsSenderShim";
const QPID_JMS_RECEIVER: &str =
    "org.apache.qpid.interop_test.shim.JmsReceiverShim";

fn path_arg(home: &Path, dir: &[&str], file: &str) -> String {
    dir.iter()
        .fold(home.to_path_buf(), |path, part| path.join(part))
        .join(file)
        .display()
        .to_string()
}

impl ShimRegistryConfig {
    /// ProtonCpp, ProtonPython and QpidJms, in that order.
    pub fn from_test_home(home: &Path) -> anyhow::Result<Self> {
        let classpath_file = home.join("shims").join("qpid-jms").join("cp.txt");
        let classpath = fs::read_to_string(&classpath_file)
            .with_context(|| {
                format!(
                    "failed to read Qpid JMS classpath from {}",
                    classpath_file.display()
                )
            })?
            .trim()
            .to_string();

        let cpp = ["shims", "qpid-proton-cpp", "build", "src"];
        let python = ["shims", "qpid-proton-python", "src"];

        Ok(Self {
            shims: vec![
                ShimConfig::new(
                    "ProtonCpp",
                    vec![path_arg(home, &cpp, "JmsSender")],
                    vec![path_arg(home, &cpp, "JmsReceiver")],
                ),
                ShimConfig::new(
                    "ProtonPython",
                    vec![
                        "python".to_string(),
                        path_arg(home, &python, "JmsSenderShim.py"),
                    ],
                    vec![
                        "python".to_string(),
                        path_arg(home, &python, "JmsReceiverShim.py"),
                    ],
                ),
                ShimConfig::new(
                    "QpidJms",
                    vec![
                        "java".to_string(),
                        "-cp".to_string(),
                        classpath.clone(),
                        QPID_JMS_SENDER.to_string(),
                    ],
                    vec![
                        "java".to_string(),
                        "-cp".to_string(),
                        classpath,
                        QPID_JMS_RECEIVER.to_string(),
                    ],
                ),
            ],
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_classpath_file_is_an_error() {
        let home = tempfile::tempdir().expect("tempdir");
        let err = ShimRegistryConfig::from_test_home(home.path())
            .expect_err("no cp.txt");
        assert!(err.to_string().contains("cp.txt"), "{err}");
    }

    #[test]
    fn default_shims_point_into_the_checkout() {
        let home = tempfile::tempdir().expect("tempdir");
        let jms = home.path().join("shims").join("qpid-jms");
        fs::create_dir_all(&jms).expect("mkdir");
        fs::write(jms.join("cp.txt"), "/m2/a.jar:/m2/b.jar\n").expect("write");

        let config =
            ShimRegistryConfig::from_test_home(home.path()).expect("config");
        let names: Vec<_> = config.shims.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["ProtonCpp", "ProtonPython", "QpidJms"]);

        let cpp = &config.shims[0];
        assert!(cpp.sender[0].ends_with("qpid-proton-cpp/build/src/JmsSender"));
        assert_eq!(config.shims[1].receiver[0], "python");
        assert_eq!(
            config.shims[2].sender,
            [
                "java",
                "-cp",
                "/m2/a.jar:/m2/b.jar",
                "org.apache.qpid.interop_test.shim.JmsSenderShim"
            ]
        );
    }
}
