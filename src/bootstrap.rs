//! Structured bootstrap configuration for the compute tier
//!
//! The planner emits environment entries as data, not rendered scripts:
//! values that only exist after execution (the database address) are
//! references into the plan, resolved by whatever renders the instance
//! bootstrap downstream.

use crate::config::TopologyConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value of one bootstrap environment entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum EnvValue {
    /// Known at planning time
    Literal { value: String },
    /// Attribute of a plan node, known only after execution
    Ref { node: Uuid, attribute: String },
}

/// One environment variable handed to the compute tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvEntry {
    pub name: String,
    pub value: EnvValue,
}

impl EnvEntry {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: EnvValue::Literal {
                value: value.into(),
            },
        }
    }

    pub fn reference(name: impl Into<String>, node: Uuid, attribute: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: EnvValue::Ref {
                node,
                attribute: attribute.into(),
            },
        }
    }
}

/// Environment map for instances booted by the launch template
pub fn bootstrap_env(database: Uuid, config: &TopologyConfig) -> Vec<EnvEntry> {
    vec![
        EnvEntry::reference("DB_HOST", database, "address"),
        EnvEntry::literal("DB_USER", &config.database.username),
        EnvEntry::literal("DB_PASSWORD", &config.database.password),
        EnvEntry::literal("DB_NAME", &config.database.name),
        EnvEntry::literal("DB_ENGINE", &config.database.engine),
        EnvEntry::literal("REGION", &config.region),
        EnvEntry::literal("NOTIFICATION_TOPIC", &config.notification_topic_ref),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ComputeConfig, DatabaseConfig, DnsConfig, PortConfig, ScalingConfig, TopologyConfig,
    };
    use std::str::FromStr;

    fn test_config() -> TopologyConfig {
        TopologyConfig {
            name: "webapp".to_string(),
            region: "us-east-1".to_string(),
            vpc_cidr: ipnet::Ipv4Net::from_str("10.0.0.0/16").unwrap(),
            subnet_prefix_length: 24,
            requested_zone_count: 2,
            public_route_cidr: ipnet::Ipv4Net::from_str("0.0.0.0/0").unwrap(),
            ports: PortConfig {
                ssh: 22,
                http: 80,
                https: 443,
                app: 8080,
            },
            compute: ComputeConfig {
                ami: "ami-0123".to_string(),
                instance_type: "t3.micro".to_string(),
                key_name: "deployer".to_string(),
                root_volume_size: 25,
            },
            database: DatabaseConfig {
                engine: "mariadb".to_string(),
                instance_class: "db.t3.micro".to_string(),
                allocated_storage: 20,
                port: 3306,
                name: "webapp".to_string(),
                username: "admin".to_string(),
                password: "secret".to_string(),
                identifier: "webapp-db".to_string(),
                skip_final_snapshot: true,
                publicly_accessible: false,
            },
            dns: DnsConfig {
                sub_domain: "app.example.com".to_string(),
                record_type: "A".to_string(),
                ttl: 60,
            },
            scaling: ScalingConfig::default(),
            certificate_ref: "cert-abc".to_string(),
            notification_topic_ref: "topic-abc".to_string(),
        }
    }

    #[test]
    fn test_database_address_is_a_reference() {
        let database = Uuid::new_v4();
        let env = bootstrap_env(database, &test_config());

        let host = env.iter().find(|e| e.name == "DB_HOST").unwrap();
        assert_eq!(
            host.value,
            EnvValue::Ref {
                node: database,
                attribute: "address".to_string(),
            }
        );
    }

    #[test]
    fn test_literals_come_from_config() {
        let env = bootstrap_env(Uuid::new_v4(), &test_config());

        let lookup = |name: &str| {
            env.iter()
                .find(|e| e.name == name)
                .map(|e| e.value.clone())
                .unwrap()
        };

        assert_eq!(
            lookup("DB_USER"),
            EnvValue::Literal {
                value: "admin".to_string()
            }
        );
        assert_eq!(
            lookup("REGION"),
            EnvValue::Literal {
                value: "us-east-1".to_string()
            }
        );
        assert_eq!(
            lookup("NOTIFICATION_TOPIC"),
            EnvValue::Literal {
                value: "topic-abc".to_string()
            }
        );
    }

    #[test]
    fn test_no_rendered_scripts() {
        // Entries are data; nothing resembling a shell line should appear
        let env = bootstrap_env(Uuid::new_v4(), &test_config());
        for entry in env {
            assert!(!entry.name.contains(' '));
            assert!(!entry.name.contains('='));
        }
    }
}
