//! Integration tests for the repository layer against a real database.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::PgPool;

use masterclass_core::badge::BadgeCategory;
use masterclass_core::contact::ContactStatus;
use masterclass_core::email_template::EmailTemplateType;
use masterclass_core::filtering::{DateRange, TextQuery};
use masterclass_core::formation::FormationLevel;
use masterclass_core::notification::NotificationKind;
use masterclass_core::referral::ReferralStatus;
use masterclass_core::types::DbId;
use masterclass_db::models::activity_log::CreateActivityLog;
use masterclass_db::models::badge::{CreateBadge, UpdateBadge};
use masterclass_db::models::contact::{ContactFilter, CreateContact};
use masterclass_db::models::email::{CreateEmailTemplate, CreateQueuedEmail, QUEUE_FAILED, QUEUE_SENT};
use masterclass_db::models::formation::{CreateFormation, CreateFormationSession, UpdateFormation};
use masterclass_db::models::notification::CreateNotification;
use masterclass_db::models::referral::{CreateReferral, ReferralStatusChange};
use masterclass_db::models::satisfaction::CreateSatisfactionSurvey;
use masterclass_db::models::user::{CreateUser, UpdateProfile, User};
use masterclass_db::repositories::{
    ActivityLogRepo, BadgeRepo, ContactRepo, EmailQueueRepo, EmailTemplateRepo, FormationRepo,
    FormationSessionRepo, NotificationRepo, PointRepo, ReferralRepo, SatisfactionRepo,
    TimelineRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str, code: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            first_name: "Claire".to_string(),
            last_name: "Dupont".to_string(),
            phone: None,
            role: "member".to_string(),
            referral_code: code.to_string(),
        },
    )
    .await
    .unwrap()
}

fn new_member(email: &str, code: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        first_name: "Lucas".to_string(),
        last_name: "Martin".to_string(),
        phone: None,
        role: "member".to_string(),
        referral_code: code.to_string(),
    }
}

fn new_badge(name: &str, points: i32) -> CreateBadge {
    CreateBadge {
        name: name.to_string(),
        description: "Première formation suivie".to_string(),
        category: BadgeCategory::Formation,
        rarity: None,
        points,
        icon: None,
    }
}

fn new_contact(name: &str, subject: &str) -> CreateContact {
    CreateContact {
        name: name.to_string(),
        email: format!("{}@example.fr", name.to_lowercase()),
        phone: None,
        subject: subject.to_string(),
        message: "Bonjour, je souhaite des informations.".to_string(),
        formation_id: None,
    }
}

fn new_formation(slug: &str, published: bool) -> CreateFormation {
    CreateFormation {
        title: "Orthodontie linguale".to_string(),
        slug: slug.to_string(),
        description: String::new(),
        level: FormationLevel::Avance,
        price_cents: 129_000,
        duration_hours: 14,
        image_url: None,
        is_published: published,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_lookup_and_profile_update(pool: PgPool) {
    let user = new_user(&pool, "claire@example.fr", "AAAA1111").await;

    let by_email = UserRepo::find_by_email(&pool, "CLAIRE@example.fr").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));

    let by_code = UserRepo::find_by_referral_code(&pool, "AAAA1111").await.unwrap();
    assert_eq!(by_code.map(|u| u.id), Some(user.id));

    let updated = UserRepo::update_profile(
        &pool,
        user.id,
        &UpdateProfile {
            city: Some("Lyon".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.city.as_deref(), Some("Lyon"));
    assert_eq!(updated.first_name, "Claire");

    UserRepo::record_login(&pool, user.id).await.unwrap();
    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    new_user(&pool, "dup@example.fr", "BBBB2222").await;
    let result = UserRepo::create(
        &pool,
        &CreateUser {
            email: "dup@example.fr".to_string(),
            password_hash: "x".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            phone: None,
            role: "member".to_string(),
            referral_code: "CCCC3333".to_string(),
        },
    )
    .await;
    assert_matches!(
        result,
        Err(sqlx::Error::Database(e)) if e.constraint() == Some("uq_users_email")
    );
}

// ---------------------------------------------------------------------------
// Badges and points
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_award_is_idempotent(pool: PgPool) {
    let user = new_user(&pool, "award@example.fr", "DDDD4444").await;
    let badge = BadgeRepo::create(&pool, &new_badge("Pionnier", 50)).await.unwrap();

    let first = BadgeRepo::award(&pool, &badge, user.id, None).await.unwrap();
    assert!(first.newly_awarded);

    let second = BadgeRepo::award(&pool, &badge, user.id, None).await.unwrap();
    assert!(!second.newly_awarded);
    assert_eq!(second.user_badge.id, first.user_badge.id);

    assert_eq!(PointRepo::total_for_user(&pool, user.id).await.unwrap(), 50);
    let events = TimelineRepo::list_for_user(&pool, user.id).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, "badge");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_badges_mark_earned(pool: PgPool) {
    let user = new_user(&pool, "member@example.fr", "EEEE5555").await;
    let earned = BadgeRepo::create(&pool, &new_badge("Assidu", 10)).await.unwrap();
    let locked = BadgeRepo::create(&pool, &new_badge("Expert", 100)).await.unwrap();
    let hidden = BadgeRepo::create(&pool, &new_badge("Archivé", 5)).await.unwrap();
    BadgeRepo::update(
        &pool,
        hidden.id,
        &UpdateBadge {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    BadgeRepo::award(&pool, &earned, user.id, None).await.unwrap();

    let badges = BadgeRepo::list_for_user(&pool, user.id).await.unwrap();
    assert_eq!(badges.len(), 2);
    assert_eq!(badges[0].badge.id, earned.id);
    assert!(badges[0].is_earned());
    assert!(badges.iter().any(|b| b.badge.id == locked.id && !b.is_earned()));

    let catalogue = BadgeRepo::list_active(&pool).await.unwrap();
    let ids: Vec<_> = catalogue.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![earned.id, locked.id]);

    let admin_list = BadgeRepo::list_with_awards(&pool, 10, 0).await.unwrap();
    let earned_row = admin_list.iter().find(|b| b.badge.id == earned.id).unwrap();
    assert_eq!(earned_row.awarded_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_point_total_defaults_to_zero(pool: PgPool) {
    let user = new_user(&pool, "zero@example.fr", "FFFF6666").await;
    assert_eq!(PointRepo::total_for_user(&pool, user.id).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Formations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_formation_with_sessions(pool: PgPool) {
    let formation = FormationRepo::create(&pool, &new_formation("linguale", false))
        .await
        .unwrap();
    let start = Utc::now() + Duration::days(30);
    for offset in [7, 0] {
        FormationSessionRepo::create(
            &pool,
            formation.id,
            &CreateFormationSession {
                starts_at: start + Duration::days(offset),
                ends_at: start + Duration::days(offset) + Duration::hours(7),
                location: "Paris".to_string(),
                capacity: 12,
            },
        )
        .await
        .unwrap();
    }

    assert!(FormationRepo::find_with_sessions(&pool, formation.id, true)
        .await
        .unwrap()
        .is_none());

    let full = FormationRepo::find_with_sessions(&pool, formation.id, false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(full.sessions.len(), 2);
    assert!(full.sessions[0].starts_at < full.sessions[1].starts_at);

    FormationRepo::update(
        &pool,
        formation.id,
        &UpdateFormation {
            is_published: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(FormationRepo::list_published(&pool).await.unwrap().len(), 1);

    assert!(FormationRepo::delete(&pool, formation.id).await.unwrap());
    assert!(FormationSessionRepo::list_for_formation(&pool, formation.id)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_status_and_filter(pool: PgPool) {
    let dupont = ContactRepo::create(&pool, &new_contact("Dupont", "Inscription"))
        .await
        .unwrap();
    let martin = ContactRepo::create(&pool, &new_contact("Martin", "Tarifs"))
        .await
        .unwrap();
    assert_eq!(dupont.status, "nouveau");

    let updated = ContactRepo::update_status(&pool, martin.id, ContactStatus::Traite)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, "traite");

    let page = ContactRepo::list_page(&pool, 25, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(ContactRepo::count(&pool).await.unwrap(), 2);

    let filter = ContactFilter {
        query: TextQuery::new(Some("dupont")),
        status: Some(ContactStatus::Nouveau),
        range: DateRange::default(),
    };
    let filtered = filter.apply(page);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, dupont.id);

    assert!(ContactRepo::delete(&pool, dupont.id).await.unwrap());
    assert!(!ContactRepo::delete(&pool, dupont.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Referrals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_referral_lifecycle(pool: PgPool) {
    let referrer = new_user(&pool, "parrain@example.fr", "GGGG7777").await;
    let referral = ReferralRepo::create(
        &pool,
        &CreateReferral {
            referrer_id: referrer.id,
            referee_email: "filleul@example.fr".to_string(),
            referee_name: Some("Filleul".to_string()),
            code: "REF12345".to_string(),
            message: None,
            status: ReferralStatus::Pending,
            referee_user_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(referral.reward_points, 0);

    assert!(ReferralRepo::mark_clicked(&pool, referral.id).await.unwrap());
    assert!(!ReferralRepo::mark_clicked(&pool, referral.id).await.unwrap());

    let referee = new_user(&pool, "filleul@example.fr", "HHHH8888").await;
    let registered = ReferralRepo::mark_registered(&pool, referral.id, referee.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(registered.status(), ReferralStatus::Registered);
    assert_eq!(registered.referee_user_id, Some(referee.id));
    assert_eq!(registered.reward_points, 25);

    let change = ReferralRepo::change_status(&pool, referral.id, ReferralStatus::Converted)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(change.previous.reward_points, 25);
    assert_eq!(change.points_delta, 100);
    let converted = change.referral;
    assert!(converted.converted_at.is_some());
    assert_eq!(converted.registered_at, registered.registered_at);
    assert_eq!(converted.reward_points, 125);

    let found = ReferralRepo::find_by_code(&pool, "REF12345").await.unwrap();
    assert_eq!(found.map(|r| r.id), Some(referral.id));

    let admin = ReferralRepo::list_page_with_referrer(&pool, 10, 0).await.unwrap();
    assert_eq!(admin[0].referrer_name, "Claire Dupont");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_change_credits_each_delta_once(pool: PgPool) {
    let referrer = new_user(&pool, "credit@example.fr", "JJJJ1111").await;
    let referral = ReferralRepo::create(
        &pool,
        &CreateReferral {
            referrer_id: referrer.id,
            referee_email: "credit-filleul@example.fr".to_string(),
            referee_name: None,
            code: "CRED0001".to_string(),
            message: None,
            status: ReferralStatus::Pending,
            referee_user_id: None,
        },
    )
    .await
    .unwrap();

    let changes = change_concurrently(&pool, referral.id, ReferralStatus::Converted, 6).await;
    let credited: Vec<i32> = changes
        .iter()
        .map(|c| c.points_delta)
        .filter(|d| *d != 0)
        .collect();
    assert_eq!(credited, vec![125]);
    assert_eq!(PointRepo::total_for_user(&pool, referrer.id).await.unwrap(), 125);

    let expired = ReferralRepo::change_status(&pool, referral.id, ReferralStatus::Expired)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(expired.points_delta, -125);
    assert_eq!(PointRepo::total_for_user(&pool, referrer.id).await.unwrap(), 0);

    let missing = ReferralRepo::change_status(&pool, referral.id + 1000, ReferralStatus::Expired)
        .await
        .unwrap();
    assert!(missing.is_none());
}

/// Run `count` status changes on the same referral concurrently.
async fn change_concurrently(
    pool: &PgPool,
    id: DbId,
    status: ReferralStatus,
    count: usize,
) -> Vec<ReferralStatusChange> {
    let handles: Vec<_> = (0..count)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move { ReferralRepo::change_status(&pool, id, status).await })
        })
        .collect();

    let mut changes = Vec::with_capacity(count);
    for handle in handles {
        changes.push(handle.await.unwrap().unwrap().unwrap());
    }
    changes
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_completes_invitation(pool: PgPool) {
    let referrer = new_user(&pool, "inviter@example.fr", "KKKK2222").await;
    let invite = ReferralRepo::create(
        &pool,
        &CreateReferral {
            referrer_id: referrer.id,
            referee_email: "invitee@example.fr".to_string(),
            referee_name: None,
            code: "INVT0001".to_string(),
            message: None,
            status: ReferralStatus::Pending,
            referee_user_id: None,
        },
    )
    .await
    .unwrap();

    let registration = UserRepo::register(
        &pool,
        &new_member("invitee@example.fr", "LLLL3333"),
        Some("INVT0001"),
    )
    .await
    .unwrap();
    let referral = registration.referral.expect("invitation completed");
    assert_eq!(referral.id, invite.id);
    assert_eq!(referral.referee_user_id, Some(registration.user.id));
    assert_eq!(PointRepo::total_for_user(&pool, referrer.id).await.unwrap(), 25);

    let member_events = TimelineRepo::list_for_user(&pool, registration.user.id)
        .await
        .unwrap();
    assert_eq!(member_events.len(), 1);
    let referrer_events = TimelineRepo::list_for_user(&pool, referrer.id).await.unwrap();
    assert_eq!(referrer_events.len(), 1);
    assert_eq!(referrer_events[0].kind, "referral");

    // A used invitation completes nothing the second time.
    let again = UserRepo::register(
        &pool,
        &new_member("other@example.fr", "MMMM4444"),
        Some("INVT0001"),
    )
    .await
    .unwrap();
    assert!(again.referral.is_none());
    assert_eq!(PointRepo::total_for_user(&pool, referrer.id).await.unwrap(), 25);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_with_personal_code_reuses_open_invitation(pool: PgPool) {
    let referrer = new_user(&pool, "sponsor@example.fr", "NNNN5555").await;
    let invite = ReferralRepo::create(
        &pool,
        &CreateReferral {
            referrer_id: referrer.id,
            referee_email: "friend@example.fr".to_string(),
            referee_name: None,
            code: "OPEN0001".to_string(),
            message: None,
            status: ReferralStatus::Pending,
            referee_user_id: None,
        },
    )
    .await
    .unwrap();

    let registration = UserRepo::register(
        &pool,
        &new_member("friend@example.fr", "PPPP6666"),
        Some("NNNN5555"),
    )
    .await
    .unwrap();
    assert_eq!(registration.referral.map(|r| r.id), Some(invite.id));
    assert_eq!(ReferralRepo::count(&pool).await.unwrap(), 1);

    let unknown = UserRepo::register(
        &pool,
        &new_member("alone@example.fr", "QQQQ7777"),
        Some("ZZZZ9999"),
    )
    .await
    .unwrap();
    assert!(unknown.referral.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rolls_back_on_duplicate_email(pool: PgPool) {
    new_user(&pool, "taken@example.fr", "RRRR8888").await;

    let result =
        UserRepo::register(&pool, &new_member("taken@example.fr", "SSSS9999"), None).await;
    assert_matches!(
        result,
        Err(sqlx::Error::Database(e)) if e.constraint() == Some("uq_users_email")
    );
    assert!(UserRepo::find_by_referral_code(&pool, "SSSS9999").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_referral_unique_per_referee(pool: PgPool) {
    let referrer = new_user(&pool, "p@example.fr", "IIII9999").await;
    let input = CreateReferral {
        referrer_id: referrer.id,
        referee_email: "same@example.fr".to_string(),
        referee_name: None,
        code: "CODE0001".to_string(),
        message: None,
        status: ReferralStatus::Pending,
        referee_user_id: None,
    };
    ReferralRepo::create(&pool, &input).await.unwrap();
    let again = ReferralRepo::create(
        &pool,
        &CreateReferral {
            code: "CODE0002".to_string(),
            ..input
        },
    )
    .await;
    assert_matches!(
        again,
        Err(sqlx::Error::Database(e)) if e.constraint() == Some("uq_referrals_referrer_email")
    );
}

// ---------------------------------------------------------------------------
// Email queue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_email_queue_due_and_failures(pool: PgPool) {
    let template = EmailTemplateRepo::create(
        &pool,
        &CreateEmailTemplate {
            name: "Bienvenue".to_string(),
            template_type: EmailTemplateType::Welcome,
            subject: "Bienvenue {{first_name}}".to_string(),
            content: "Bonjour {{first_name}}".to_string(),
            auto_send: true,
            send_delay_minutes: 0,
        },
    )
    .await
    .unwrap();
    let active = EmailTemplateRepo::find_active_by_type(&pool, EmailTemplateType::Welcome)
        .await
        .unwrap();
    assert_eq!(active.map(|t| t.id), Some(template.id));

    let due = EmailQueueRepo::enqueue(
        &pool,
        &CreateQueuedEmail {
            template_id: template.id,
            recipient_email: "a@example.fr".to_string(),
            variables: json!({ "first_name": "Anne" }),
            send_at: Utc::now() - Duration::minutes(1),
        },
    )
    .await
    .unwrap();
    let later = EmailQueueRepo::enqueue(
        &pool,
        &CreateQueuedEmail {
            template_id: template.id,
            recipient_email: "b@example.fr".to_string(),
            variables: json!({}),
            send_at: Utc::now() + Duration::hours(1),
        },
    )
    .await
    .unwrap();

    let listed = EmailQueueRepo::list_due(&pool, 3, 10).await.unwrap();
    assert_eq!(listed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![due.id]);

    EmailQueueRepo::mark_failed(&pool, due.id, "timeout", 2).await.unwrap();
    let row = EmailQueueRepo::find_by_id(&pool, due.id).await.unwrap().unwrap();
    assert_eq!((row.status.as_str(), row.attempts), ("pending", 1));

    EmailQueueRepo::mark_failed(&pool, due.id, "timeout", 2).await.unwrap();
    let row = EmailQueueRepo::find_by_id(&pool, due.id).await.unwrap().unwrap();
    assert_eq!(row.status, QUEUE_FAILED);
    assert_eq!(row.last_error.as_deref(), Some("timeout"));

    EmailQueueRepo::mark_sent(&pool, later.id).await.unwrap();
    let row = EmailQueueRepo::find_by_id(&pool, later.id).await.unwrap().unwrap();
    assert_eq!(row.status, QUEUE_SENT);
    assert!(row.sent_at.is_some());
}

// ---------------------------------------------------------------------------
// Back office
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activity_log_carries_admin_name(pool: PgPool) {
    let admin = new_user(&pool, "admin@example.fr", "JJJJ0000").await;
    let entry = ActivityLogRepo::append(
        &pool,
        &CreateActivityLog {
            admin_id: Some(admin.id),
            action_type: "create_formation".to_string(),
            entity_type: Some("formation".to_string()),
            entity_id: Some(42),
            details: Some(json!({ "title": "Orthodontie" })),
        },
    )
    .await
    .unwrap();
    assert_eq!(entry.admin_name.as_deref(), Some("Claire Dupont"));

    ActivityLogRepo::append(
        &pool,
        &CreateActivityLog {
            admin_id: None,
            action_type: "export".to_string(),
            entity_type: None,
            entity_id: None,
            details: None,
        },
    )
    .await
    .unwrap();

    let page = ActivityLogRepo::list_page(&pool, 10, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(ActivityLogRepo::count(&pool).await.unwrap(), 2);
    let for_entity = ActivityLogRepo::list_for_entity(&pool, "formation", 42).await.unwrap();
    assert_eq!(for_entity.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_notifications_read_state(pool: PgPool) {
    for title in ["Nouveau contact", "Nouvel avis"] {
        NotificationRepo::create(
            &pool,
            &CreateNotification {
                kind: NotificationKind::Contact,
                title: title.to_string(),
                message: "Message".to_string(),
                link: None,
                entity_type: None,
                entity_id: None,
            },
        )
        .await
        .unwrap();
    }
    assert_eq!(NotificationRepo::unread_count(&pool).await.unwrap(), 2);

    let first = NotificationRepo::list(&pool, false, 10, 0).await.unwrap()[0].clone();
    let read = NotificationRepo::mark_read(&pool, first.id).await.unwrap().unwrap();
    assert!(read.is_read);
    assert_eq!(NotificationRepo::unread_count(&pool).await.unwrap(), 1);
    assert_eq!(NotificationRepo::list(&pool, true, 10, 0).await.unwrap().len(), 1);

    assert_eq!(NotificationRepo::mark_all_read(&pool).await.unwrap(), 1);
    assert_eq!(NotificationRepo::unread_count(&pool).await.unwrap(), 0);
    assert!(NotificationRepo::mark_read(&pool, 999_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_satisfaction_answers(pool: PgPool) {
    for (rating, recommendation) in [(5, Some(10)), (3, None)] {
        SatisfactionRepo::create(
            &pool,
            None,
            &CreateSatisfactionSurvey {
                formation_id: None,
                respondent_name: None,
                respondent_email: None,
                rating,
                recommendation,
                comment: None,
            },
        )
        .await
        .unwrap();
    }
    let answers = SatisfactionRepo::list_answers(&pool, None).await.unwrap();
    assert_eq!(answers.len(), 2);
    assert_eq!(SatisfactionRepo::count(&pool, None).await.unwrap(), 2);
    assert_eq!(SatisfactionRepo::count(&pool, Some(1)).await.unwrap(), 0);
}
