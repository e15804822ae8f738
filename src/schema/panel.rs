//! The hosting panel model: websites and their dependents, backup plumbing,
//! and cloud-drive destinations.
//!
//! Deletion rules: a website's dependents (child domains, backups, alias
//! domains, git logs, backup-job memberships) go with it; admins and packages
//! are protected while any website references them.

use crate::schema::types::{ColumnDef, OnDelete, PanelModel, TableDef};

pub fn panel_model() -> PanelModel {
    PanelModel {
        tables: vec![
            TableDef::new("admins")
                .column(ColumnDef::varchar("user_name", 50).unique())
                .column(ColumnDef::varchar("email", 50)),
            TableDef::new("packages").column(ColumnDef::varchar("name", 50).unique()),
            TableDef::new("websites")
                .foreign_key("admin_id", "admins", OnDelete::Protect)
                .foreign_key("package_id", "packages", OnDelete::Protect)
                .column(ColumnDef::varchar("domain", 50).unique())
                .column(ColumnDef::varchar("admin_email", 50))
                .column(ColumnDef::varchar("php_selection", 10))
                .column(ColumnDef::integer("ssl"))
                .column(ColumnDef::integer("state").default_int(1))
                // Nullable rather than a sentinel default; absence is NULL.
                .column(ColumnDef::varchar("external_app", 30).nullable()),
            TableDef::new("child_domains")
                .foreign_key("master_id", "websites", OnDelete::Cascade)
                .column(ColumnDef::varchar("domain", 50).unique())
                .column(ColumnDef::varchar("path", 200).nullable())
                .column(ColumnDef::integer("ssl"))
                .column(ColumnDef::varchar("php_selection", 10).nullable()),
            TableDef::new("backups")
                .foreign_key("website_id", "websites", OnDelete::Cascade)
                .column(ColumnDef::varchar("file_name", 200))
                .column(ColumnDef::varchar("date", 50))
                .column(ColumnDef::varchar("size", 50))
                .column(ColumnDef::integer("status").default_int(0)),
            TableDef::new("destinations").column(ColumnDef::varchar("dest_loc", 18).unique()),
            TableDef::new("backup_schedules")
                .foreign_key("destination_id", "destinations", OnDelete::Cascade)
                .column(ColumnDef::varchar("frequency", 15)),
            TableDef::new("alias_domains")
                .foreign_key("master_id", "websites", OnDelete::Cascade)
                .column(ColumnDef::varchar("alias_domain", 75)),
            TableDef::new("git_logs")
                .foreign_key("owner_id", "websites", OnDelete::Cascade)
                .column(ColumnDef::timestamp("date").default_expr("NOW()"))
                .column(ColumnDef::varchar("type", 5))
                .column(ColumnDef::text("message")),
            TableDef::new("backup_jobs")
                .column(ColumnDef::varchar("log_file", 1000))
                .column(ColumnDef::varchar("ip_address", 50))
                .column(ColumnDef::varchar("port", 15))
                .column(ColumnDef::integer("job_success_sites"))
                .column(ColumnDef::integer("job_failed_sites"))
                .column(ColumnDef::integer("location")),
            TableDef::new("backup_job_logs")
                .foreign_key("job_id", "backup_jobs", OnDelete::Cascade)
                .column(ColumnDef::integer("status"))
                .column(ColumnDef::text("message")),
            TableDef::new("cloud_drives")
                .foreign_key("admin_id", "admins", OnDelete::Cascade)
                .column(ColumnDef::varchar("name", 50).unique())
                .column(ColumnDef::text("auth").default_text("Inactive"))
                .column(ColumnDef::varchar("run_time", 20).default_text("NEVER")),
            TableDef::new("cloud_drive_sites")
                .foreign_key("drive_id", "cloud_drives", OnDelete::Cascade)
                .column(ColumnDef::varchar("domain", 200)),
            TableDef::new("cloud_drive_job_logs")
                .foreign_key("drive_id", "cloud_drives", OnDelete::Cascade)
                .column(ColumnDef::integer("status"))
                .column(ColumnDef::text("message")),
            TableDef::new("backup_dest_configs")
                .column(ColumnDef::varchar("name", 25))
                .column(ColumnDef::text("config")),
            TableDef::new("backup_job_configs")
                .foreign_key("dest_id", "backup_dest_configs", OnDelete::Cascade)
                .column(ColumnDef::varchar("name", 25))
                .column(ColumnDef::text("config")),
            TableDef::new("backup_job_sites")
                .foreign_key("job_id", "backup_job_configs", OnDelete::Cascade)
                .foreign_key("website_id", "websites", OnDelete::Cascade),
            TableDef::new("backup_job_config_logs")
                .foreign_key("job_id", "backup_job_configs", OnDelete::Cascade)
                .column(ColumnDef::integer("status"))
                .column(ColumnDef::text("message")),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::OnDelete;

    #[test]
    fn model_validates_and_resolves() {
        let model = panel_model();
        let resolved = crate::schema::resolve(&model).unwrap();
        assert_eq!(resolved.tables.len(), 18);
        assert!(resolved.table("websites").is_some());
        assert!(resolved.table("backup_job_sites").is_some());
    }

    #[test]
    fn website_parents_are_protected() {
        let model = panel_model();
        let websites = model.tables.iter().find(|t| t.name == "websites").unwrap();
        for fk in &websites.foreign_keys {
            assert_eq!(fk.on_delete, OnDelete::Protect, "{}", fk.column);
        }
    }

    #[test]
    fn website_dependents_cascade() {
        let model = panel_model();
        for name in ["child_domains", "backups", "alias_domains", "git_logs"] {
            let table = model.tables.iter().find(|t| t.name == name).unwrap();
            let fk = table
                .foreign_keys
                .iter()
                .find(|fk| fk.references == "websites")
                .unwrap();
            assert_eq!(fk.on_delete, OnDelete::Cascade, "{}", name);
        }
    }

    #[test]
    fn domain_like_columns_are_unique() {
        let model = panel_model();
        for (table, column) in [
            ("websites", "domain"),
            ("child_domains", "domain"),
            ("destinations", "dest_loc"),
            ("cloud_drives", "name"),
        ] {
            let t = model.tables.iter().find(|t| t.name == table).unwrap();
            let c = t.columns.iter().find(|c| c.name == column).unwrap();
            assert!(c.unique, "{}.{}", table, column);
        }
    }
}
