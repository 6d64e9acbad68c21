//! System user secret.
//!
//! Passwords are collected with masked prompts and only ever leave the
//! process as arguments to the create-secret command. Logs see the redacted
//! display form.
use crate::config::SecretDefaults;
use crate::exec::{ClusterTools, CommandLine};
use crate::prompts::Prompt;
use anyhow::Result;
use std::fmt;

pub const SECRET_NAME: &str = "system-user-secrets";
pub const SECRET_NAMESPACE: &str = "mapr-system";
const REDACTED: &str = "********";

#[derive(Clone, PartialEq, Eq)]
pub struct SecretBundle {
    pub user: String,
    pub group: String,
    pub uid: u32,
    pub gid: u32,
    password: String,
    pub mysql_user: String,
    mysql_password: String,
    pub ldapadmin_user: String,
    ldapadmin_password: String,
    pub ldapbind_user: String,
    ldapbind_password: String,
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBundle")
            .field("user", &self.user)
            .field("group", &self.group)
            .field("uid", &self.uid)
            .field("gid", &self.gid)
            .field("password", &REDACTED)
            .field("mysql_user", &self.mysql_user)
            .field("mysql_password", &REDACTED)
            .field("ldapadmin_user", &self.ldapadmin_user)
            .field("ldapadmin_password", &REDACTED)
            .field("ldapbind_user", &self.ldapbind_user)
            .field("ldapbind_password", &REDACTED)
            .finish()
    }
}

impl SecretBundle {
    /// Bundle built from configured values without asking.
    pub fn from_defaults(defaults: &SecretDefaults) -> Self {
        Self {
            user: defaults.user.clone(),
            group: defaults.group.clone(),
            uid: defaults.uid,
            gid: defaults.gid,
            password: defaults.password.clone(),
            mysql_user: defaults.mysql_user.clone(),
            mysql_password: defaults.mysql_password.clone(),
            ldapadmin_user: defaults.ldapadmin_user.clone(),
            ldapadmin_password: defaults.ldapadmin_password.clone(),
            ldapbind_user: defaults.ldapbind_user.clone(),
            ldapbind_password: defaults.ldapbind_password.clone(),
        }
    }

    /// Ask for the three passwords, seeded from configuration.
    pub fn collect(prompt: &mut dyn Prompt, defaults: &SecretDefaults) -> Result<Self> {
        let mut bundle = Self::from_defaults(defaults);
        println!("We need to create a secret containing sensitive user information.");
        println!("The system user ({}) starts containers in the cluster.", bundle.user);
        bundle.password = prompt.text("MapR systemuser password", &bundle.password, true, "MAPR_USER")?;
        println!("The LDAP admin user runs the example OpenLDAP server.");
        bundle.ldapadmin_password = prompt.text(
            "LDAP admin password",
            &bundle.ldapadmin_password,
            true,
            "LDAP_PASSWORD",
        )?;
        println!("The LDAP bind user lets SSSD reach your LDAP server.");
        bundle.ldapbind_password = prompt.text(
            "LDAP bind password",
            &bundle.ldapbind_password,
            true,
            "LDAP_BIND_PASSWORD",
        )?;
        tracing::info!(user = %bundle.user, "user secret values collected");
        Ok(bundle)
    }

    fn literals(&self) -> Vec<(&'static str, String, bool)> {
        vec![
            ("MAPR_USER", self.user.clone(), false),
            ("MAPR_PASSWORD", self.password.clone(), true),
            ("MAPR_GROUP", self.group.clone(), false),
            ("MAPR_UID", self.uid.to_string(), false),
            ("MAPR_GID", self.gid.to_string(), false),
            ("MYSQL_USER", self.mysql_user.clone(), false),
            ("MYSQL_PASSWORD", self.mysql_password.clone(), true),
            ("LDAPADMIN_USER", self.ldapadmin_user.clone(), false),
            ("LDAPADMIN_PASSWORD", self.ldapadmin_password.clone(), true),
            ("LDAPBIND_USER", self.ldapbind_user.clone(), false),
            ("LDAPBIND_PASSWORD", self.ldapbind_password.clone(), true),
        ]
    }

    /// One `create secret generic` call carrying every field as a literal.
    pub fn create_command(&self, tools: &ClusterTools) -> CommandLine {
        let head = [
            "create",
            "secret",
            "generic",
            SECRET_NAME,
            "-n",
            SECRET_NAMESPACE,
        ];
        let literals = self.literals();
        let argv = tools.kubectl_argv(
            head.iter()
                .map(|part| part.to_string())
                .chain(
                    literals
                        .iter()
                        .map(|(name, value, _)| format!("--from-literal={name}={value}")),
                ),
        );
        let shown = tools.kubectl_argv(
            head.iter()
                .map(|part| part.to_string())
                .chain(literals.iter().map(|(name, value, secret)| {
                    let value = if *secret { REDACTED } else { value.as_str() };
                    format!("--from-literal={name}={value}")
                })),
        );
        CommandLine::redacted(argv, shell_words::join(&shown))
    }
}
