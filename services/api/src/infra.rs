use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use frontdesk::auth::{
    issue_token, AuthError, Principal, SessionStore, SessionToken, UserAccount, UserDirectory,
};
use frontdesk::hotel::domain::{Employee, EmployeeId, StaffRole};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Login accounts held in memory; provisioning happens out of band (seeding,
/// demo setup), matching the original's management scripts.
#[derive(Default, Clone)]
pub(crate) struct InMemoryUserDirectory {
    accounts: Arc<Mutex<HashMap<String, UserAccount>>>,
}

impl InMemoryUserDirectory {
    pub(crate) fn register(&self, account: UserAccount) {
        self.accounts
            .lock()
            .expect("directory mutex poisoned")
            .insert(account.username.clone(), account);
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn find(&self, username: &str) -> Result<Option<UserAccount>, AuthError> {
        Ok(self
            .accounts
            .lock()
            .expect("directory mutex poisoned")
            .get(username)
            .cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, Principal>>>,
}

impl SessionStore for InMemorySessionStore {
    fn open(&self, principal: Principal) -> Result<SessionToken, AuthError> {
        let token = issue_token();
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(token.clone(), principal);
        Ok(SessionToken(token))
    }

    fn resolve(&self, token: &str) -> Result<Option<Principal>, AuthError> {
        Ok(self
            .sessions
            .lock()
            .expect("session mutex poisoned")
            .get(token)
            .cloned())
    }

    fn close(&self, token: &str) -> Result<(), AuthError> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .remove(token);
        Ok(())
    }
}

static EMPLOYEE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn staff_member(username: &str, role: StaffRole, hire_date: NaiveDate) -> Employee {
    Employee {
        id: EmployeeId(EMPLOYEE_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
        username: username.to_string(),
        role,
        phone: String::new(),
        active: true,
        hire_date,
    }
}

/// Ensure the service is reachable on first boot: honor
/// `APP_ADMIN_PASSWORD` when set, otherwise issue a random one and log it.
pub(crate) fn bootstrap_admin(directory: &InMemoryUserDirectory, hire_date: NaiveDate) {
    let (password, generated) = match std::env::var("APP_ADMIN_PASSWORD") {
        Ok(value) if !value.is_empty() => (value, false),
        _ => (issue_token()[..12].to_string(), true),
    };

    directory.register(UserAccount {
        username: "admin".to_string(),
        password: password.clone(),
        principal: Principal::Staff {
            employee: staff_member("admin", StaffRole::Admin, hire_date),
        },
    });

    if generated {
        tracing::warn!(%password, "no APP_ADMIN_PASSWORD set; generated admin password");
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
