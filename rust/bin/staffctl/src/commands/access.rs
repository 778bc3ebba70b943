//! `staffctl register` and `staffctl login`.

use anyhow::Result;
use staffdesk_staff::service::{gate, PasswordStrength, Registration};
use staffdesk_staff::{Access, Role, StaffService};

use crate::output::{print_json, render_pairs, Output};

/// Create an admin account from the registration form fields.
pub fn register(service: &StaffService, input: Registration, out: Output) -> Result<()> {
    let strength = PasswordStrength::of(&input.password);
    let user = service.register_admin(input)?;
    match out {
        Output::Json => print_json(&user),
        Output::Table => {
            if let Some(strength) = strength {
                eprintln!("password strength: {}", strength.as_str());
            }
            println!("admin {} registered (id {}).", user.email(), user.profile().id);
            Ok(())
        }
    }
}

/// Log in as `role` and report where the dashboard for `dashboard` (the
/// user's own role when not given) would send them.
pub fn login(
    service: &StaffService,
    email: &str,
    password: &str,
    role: Role,
    dashboard: Option<Role>,
    out: Output,
) -> Result<Access> {
    let user = service.authenticate(email, password, role)?;
    let target = dashboard.unwrap_or(role);
    let access = gate(Some(&user), Some(target));
    let path = access.redirect_path().unwrap_or(target.dashboard_path());

    match out {
        Output::Json => print_json(&serde_json::json!({
            "user": user,
            "access": format!("{:?}", access),
            "path": path,
        }))?,
        Output::Table => {
            println!("Welcome, {}.", user.first_name());
            println!(
                "{}",
                render_pairs(&[
                    ("role", user.role().to_string()),
                    ("access", format!("{:?}", access)),
                    ("path", path.to_string()),
                ])
            );
        }
    }
    Ok(access)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str) -> Registration {
        Registration {
            username: "root".into(),
            email: email.into(),
            password: "s3cret!!".into(),
        }
    }

    #[test]
    fn register_then_login() {
        let service = StaffService::in_memory();
        register(&service, registration("root@x.com"), Output::Table).unwrap();
        assert_eq!(service.get_user("root@x.com").unwrap().role(), Role::Admin);
        assert!(register(&service, registration("root@x.com"), Output::Json).is_err());

        let access = login(&service, "root@x.com", "s3cret!!", Role::Admin, None, Output::Table).unwrap();
        assert_eq!(access, Access::Granted);

        let access = login(
            &service,
            "root@x.com",
            "s3cret!!",
            Role::Admin,
            Some(Role::Trainer),
            Output::Json,
        )
        .unwrap();
        assert_eq!(access, Access::Unauthorized);
    }

    #[test]
    fn login_rejects_wrong_role_or_password() {
        let service = StaffService::in_memory();
        register(&service, registration("root@x.com"), Output::Table).unwrap();

        assert!(login(&service, "root@x.com", "nope", Role::Admin, None, Output::Table).is_err());
        assert!(login(&service, "root@x.com", "s3cret!!", Role::Analyst, None, Output::Table).is_err());
    }
}
