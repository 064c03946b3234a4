//! Tests for the defect lifecycle service.

use std::sync::{Arc, Mutex};

use super::*;
use crate::domain::ports::{
    DefectPersistenceError, MockDefectRepository, UserPersistenceError,
};
use crate::domain::{ErrorCode, PasswordHash, StatusUpdate, UserSummary};
use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixture_timestamp().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_timestamp()
    }
}

fn person(name: &str, role: Role) -> User {
    User::new(
        UserId::random(),
        Username::new(name).expect("valid username"),
        role,
        PasswordHash::from_stored("$argon2id$unused"),
    )
}

/// Users known to the stub directory.
#[derive(Default)]
struct StubUsers {
    users: Vec<User>,
}

#[async_trait]
impl UserRepository for StubUsers {
    async fn insert(&self, _user: &User) -> Result<(), UserPersistenceError> {
        Err(UserPersistenceError::query("read-only stub"))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .users
            .iter()
            .filter(|user| user.role() == role)
            .cloned()
            .collect())
    }
}

/// Defect store that joins summaries from a fixed user list.
struct StubDefects {
    users: Vec<User>,
    defects: Mutex<Vec<Defect>>,
}

impl StubDefects {
    fn new(users: Vec<User>) -> Self {
        Self {
            users,
            defects: Mutex::new(Vec::new()),
        }
    }

    fn summary(&self, id: &UserId) -> Result<UserSummary, DefectPersistenceError> {
        self.users
            .iter()
            .find(|user| user.id() == id)
            .map(UserSummary::from)
            .ok_or_else(|| DefectPersistenceError::query("dangling user reference"))
    }

    fn stored(&self) -> Vec<Defect> {
        self.defects.lock().expect("defects lock").clone()
    }
}

#[async_trait]
impl DefectRepository for StubDefects {
    async fn insert(&self, defect: &NewDefect) -> Result<Defect, DefectPersistenceError> {
        let author = self.summary(&defect.author_id)?;
        let assignee = defect
            .assignee_id
            .as_ref()
            .map(|id| self.summary(id))
            .transpose()?;
        let mut defects = self.defects.lock().expect("defects lock");
        let next = i64::try_from(defects.len()).expect("small fixture") + 1;
        let stored = Defect {
            id: DefectId::new(next).expect("positive id"),
            title: defect.title.clone(),
            description: defect.description.clone(),
            priority: defect.priority,
            status: defect.status,
            author,
            assignee,
            created_at: defect.created_at,
        };
        defects.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: DefectId) -> Result<Option<Defect>, DefectPersistenceError> {
        Ok(self.stored().into_iter().find(|defect| defect.id == id))
    }

    async fn list_all(&self) -> Result<Vec<Defect>, DefectPersistenceError> {
        Ok(self.stored())
    }

    async fn update_status(
        &self,
        update: &StatusUpdate,
    ) -> Result<Option<Defect>, DefectPersistenceError> {
        let mut defects = self.defects.lock().expect("defects lock");
        let Some(defect) = defects.iter_mut().find(|defect| update.matches(defect)) else {
            return Ok(None);
        };
        defect.status = update.status;
        Ok(Some(defect.clone()))
    }
}

#[derive(Clone)]
struct Team {
    manager: User,
    engineer: User,
    bystander: User,
    leader: User,
}

#[fixture]
fn team() -> Team {
    Team {
        manager: person("manager", Role::Manager),
        engineer: person("engineer", Role::Engineer),
        bystander: person("bystander", Role::Engineer),
        leader: person("leader", Role::Leader),
    }
}

type Service = DefectService<StubDefects, StubUsers>;

fn make_service(team: &Team) -> (Service, Arc<StubDefects>) {
    let users = vec![
        team.manager.clone(),
        team.engineer.clone(),
        team.bystander.clone(),
        team.leader.clone(),
    ];
    let defects = Arc::new(StubDefects::new(users.clone()));
    let service = DefectService::new(
        Arc::clone(&defects),
        Arc::new(StubUsers { users }),
        Arc::new(FixtureClock),
    );
    (service, defects)
}

fn draft(title: &str, priority: Option<&str>, assignee: Option<&str>) -> DefectDraft {
    DefectDraft {
        title: title.to_owned(),
        description: None,
        priority: priority.map(str::to_owned),
        assignee_username: assignee.map(str::to_owned),
    }
}

#[rstest]
#[tokio::test]
async fn manager_files_assigned_defect(team: Team) {
    let (service, _) = make_service(&team);

    let defect = service
        .create(&team.manager, draft("Login fails", Some("High"), Some("engineer")))
        .await
        .expect("manager may file");

    assert_eq!(defect.title.as_ref(), "Login fails");
    assert_eq!(defect.priority, Priority::High);
    assert_eq!(defect.status, DefectStatus::New);
    assert_eq!(defect.author.id, *team.manager.id());
    assert_eq!(
        defect.assignee.as_ref().map(|assignee| assignee.id),
        Some(*team.engineer.id())
    );
    assert_eq!(defect.created_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn priority_defaults_to_medium(team: Team) {
    let (service, _) = make_service(&team);

    let defect = service
        .create(&team.engineer, draft("Crash on save", None, None))
        .await
        .expect("engineer may file");

    assert_eq!(defect.priority, Priority::Medium);
    assert!(defect.assignee.is_none());
}

#[rstest]
#[case(Some("engineer"))]
#[case(Some("manager"))]
#[tokio::test]
async fn engineer_supplied_assignee_is_ignored(team: Team, #[case] assignee: Option<&str>) {
    let (service, _) = make_service(&team);

    let defect = service
        .create(&team.engineer, draft("Slow search", None, assignee))
        .await
        .expect("engineer may file");

    assert!(defect.assignee.is_none());
}

#[rstest]
#[case("leader")]
#[case("manager")]
#[case("ghost")]
#[case("not a name")]
#[tokio::test]
async fn manager_choosing_non_engineer_leaves_defect_unassigned(
    team: Team,
    #[case] assignee: &str,
) {
    let (service, _) = make_service(&team);

    let defect = service
        .create(&team.manager, draft("Broken link", None, Some(assignee)))
        .await
        .expect("manager may file");

    assert!(defect.assignee.is_none());
}

#[rstest]
#[tokio::test]
async fn leader_cannot_file_even_with_invalid_input(team: Team) {
    let (service, defects) = make_service(&team);

    let err = service
        .create(&team.leader, draft("   ", Some("urgent"), None))
        .await
        .expect_err("leaders may not file");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert!(defects.stored().is_empty());
}

#[rstest]
#[case("   ", None, "title")]
#[case("ok title", Some("urgent"), "priority")]
#[tokio::test]
async fn invalid_input_is_rejected_for_permitted_actors(
    team: Team,
    #[case] title: &str,
    #[case] priority: Option<&str>,
    #[case] field: &str,
) {
    let (service, defects) = make_service(&team);

    let err = service
        .create(&team.engineer, draft(title, priority, None))
        .await
        .expect_err("validation fails");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().expect("details present")["field"], field);
    assert!(defects.stored().is_empty());
}

#[rstest]
#[tokio::test]
async fn assignee_may_progress_and_close_twice(team: Team) {
    let (service, _) = make_service(&team);
    let defect = service
        .create(&team.manager, draft("Login fails", Some("High"), Some("engineer")))
        .await
        .expect("manager may file");

    let progressed = service
        .set_status(&team.engineer, defect.id, DefectStatus::InProgress)
        .await
        .expect("assignee may progress");
    assert_eq!(progressed.status, DefectStatus::InProgress);

    let closed = service
        .set_status(&team.engineer, defect.id, DefectStatus::Closed)
        .await
        .expect("assignee may close");
    let closed_again = service
        .set_status(&team.engineer, defect.id, DefectStatus::Closed)
        .await
        .expect("closing again is allowed");
    assert_eq!(closed.status, DefectStatus::Closed);
    assert_eq!(closed_again.status, DefectStatus::Closed);
}

#[rstest]
#[tokio::test]
async fn any_status_may_follow_any_other(team: Team) {
    let (service, _) = make_service(&team);
    let defect = service
        .create(&team.engineer, draft("Typo", Some("low"), None))
        .await
        .expect("engineer may file");

    for status in [DefectStatus::Closed, DefectStatus::New, DefectStatus::InReview] {
        let updated = service
            .set_status(&team.engineer, defect.id, status)
            .await
            .expect("author may change status");
        assert_eq!(updated.status, status);
    }
}

#[rstest]
#[case::bystander(false)]
#[case::leader(true)]
#[tokio::test]
async fn uninvolved_actor_cannot_change_status(team: Team, #[case] as_leader: bool) {
    let (service, defects) = make_service(&team);
    let defect = service
        .create(&team.manager, draft("Login fails", Some("High"), Some("engineer")))
        .await
        .expect("manager may file");
    let actor = if as_leader { &team.leader } else { &team.bystander };

    let err = service
        .set_status(actor, defect.id, DefectStatus::Closed)
        .await
        .expect_err("uninvolved actor denied");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(defects.stored()[0].status, DefectStatus::New);
}

#[rstest]
#[tokio::test]
async fn unknown_defect_is_not_found(team: Team) {
    let (service, _) = make_service(&team);
    let id = DefectId::new(42).expect("positive id");

    let err = service
        .set_status(&team.engineer, id, DefectStatus::Closed)
        .await
        .expect_err("missing defect");
    assert_eq!(err.code(), ErrorCode::NotFound);

    let err = service.get(id).await.expect_err("missing defect");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn stale_guard_reports_conflict_without_writing(team: Team) {
    let author = UserSummary::from(&team.engineer);
    let defect = Defect {
        id: DefectId::new(7).expect("positive id"),
        title: DefectTitle::new("Race").expect("valid title"),
        description: None,
        priority: Priority::Medium,
        status: DefectStatus::New,
        author,
        assignee: None,
        created_at: fixture_timestamp(),
    };
    let expected_guard = defect.status_update(DefectStatus::Closed);
    let mut repo = MockDefectRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(defect)));
    repo.expect_update_status()
        .withf(move |update| *update == expected_guard)
        .times(1)
        .return_once(|_| Ok(None));

    let service = DefectService::new(
        Arc::new(repo),
        Arc::new(StubUsers::default()),
        Arc::new(FixtureClock),
    );
    let err = service
        .set_status(&team.engineer, DefectId::new(7).expect("positive id"), DefectStatus::Closed)
        .await
        .expect_err("guard mismatch");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn storage_outage_surfaces_as_service_unavailable(team: Team) {
    let mut repo = MockDefectRepository::new();
    repo.expect_list_all()
        .return_once(|| Err(DefectPersistenceError::connection("refused")));

    let service = DefectService::new(
        Arc::new(repo),
        Arc::new(StubUsers::default()),
        Arc::new(FixtureClock),
    );
    let err = service.stats(&team.leader).await.expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn list_all_is_unfiltered_and_ordered(team: Team) {
    let (service, _) = make_service(&team);
    service
        .create(&team.manager, draft("First", None, None))
        .await
        .expect("file first");
    service
        .create(&team.engineer, draft("Second", None, None))
        .await
        .expect("file second");

    let defects = service.list_all().await.expect("list succeeds");
    let titles: Vec<&str> = defects.iter().map(|defect| defect.title.as_ref()).collect();
    assert_eq!(titles, ["First", "Second"]);
}

#[rstest]
#[tokio::test]
async fn leader_sees_stats_matching_the_list(team: Team) {
    let (service, _) = make_service(&team);
    service
        .create(&team.manager, draft("Login fails", Some("High"), Some("engineer")))
        .await
        .expect("file assigned");
    let unassigned = service
        .create(&team.engineer, draft("Typo", Some("Low"), None))
        .await
        .expect("file unassigned");
    service
        .set_status(&team.engineer, unassigned.id, DefectStatus::Closed)
        .await
        .expect("close");

    let stats = service.stats(&team.leader).await.expect("leader sees stats");

    assert_eq!(stats.total, 2);
    assert_eq!(stats.unassigned, 1);
    assert_eq!(stats.status_count(DefectStatus::New), 1);
    assert_eq!(stats.status_count(DefectStatus::Closed), 1);
    assert_eq!(stats.priority_count(Priority::High), 1);
    assert_eq!(stats.priority_count(Priority::Low), 1);
    assert_eq!(stats.priority_count(Priority::Medium), 0);
}

#[rstest]
#[case(Role::Engineer)]
#[case(Role::Manager)]
#[tokio::test]
async fn only_leaders_see_stats(team: Team, #[case] role: Role) {
    let (service, _) = make_service(&team);
    let actor = person("someone", role);

    let err = service.stats(&actor).await.expect_err("not a leader");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[derive(Clone)]
struct FiledDefect {
    team: Team,
    service: Arc<Service>,
    defect: Defect,
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("test runtime")
        .block_on(future)
}

#[given("a manager, an engineer, and an uninvolved engineer")]
fn a_team_of_three(team: Team) -> Team {
    team
}

#[when("the manager files a defect assigned to the engineer")]
fn the_manager_files_an_assigned_defect(team: Team) -> FiledDefect {
    let (service, _) = make_service(&team);
    let defect = block_on(service.create(
        &team.manager,
        draft("Login fails", Some("High"), Some("engineer")),
    ))
    .expect("manager may file");
    FiledDefect {
        team,
        service: Arc::new(service),
        defect,
    }
}

#[then("only the participants may change its status")]
fn only_participants_may_change_status(filed: FiledDefect) {
    let FiledDefect {
        team,
        service,
        defect,
    } = filed;
    let denied = block_on(service.set_status(&team.bystander, defect.id, DefectStatus::Closed))
        .expect_err("bystander denied");
    assert_eq!(denied.code(), ErrorCode::Forbidden);

    for actor in [&team.manager, &team.engineer] {
        let updated = block_on(service.set_status(actor, defect.id, DefectStatus::InReview))
            .expect("participant allowed");
        assert_eq!(updated.status, DefectStatus::InReview);
    }
}

#[rstest]
fn participants_control_status(team: Team) {
    let team = a_team_of_three(team);
    let filed = the_manager_files_an_assigned_defect(team);
    only_participants_may_change_status(filed);
}
