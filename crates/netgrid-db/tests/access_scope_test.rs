//! Integration tests for access scoping through the repositories.

use std::collections::BTreeSet;

use netgrid_core::context::RequestContext;
use netgrid_core::error::NetgridError;
use netgrid_core::models::principal::Principal;
use netgrid_core::models::tenant::{
    CreateTenant, CreateTenantGroup, Tenant, TenantGroup, UpdateTenant, UpdateTenantGroup,
};
use netgrid_core::repository::{ListOptions, TenantGroupRepository, TenantRepository};
use netgrid_db::repository::{SurrealTenantGroupRepository, SurrealTenantRepository};
use netgrid_db::run_migrations;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();
    db
}

fn principal_in(groups: &[Uuid]) -> Principal {
    Principal {
        id: Some(Uuid::new_v4()),
        username: "alice".into(),
        group_memberships: groups.iter().copied().collect(),
        ..Principal::anonymous()
    }
}

fn principal_with_id(id: Uuid) -> Principal {
    Principal {
        id: Some(id),
        username: "bob".into(),
        ..Principal::anonymous()
    }
}

fn superuser() -> Principal {
    Principal {
        id: Some(Uuid::new_v4()),
        username: "root".into(),
        is_superuser: true,
        ..Principal::anonymous()
    }
}

fn tenant_names(items: &[Tenant]) -> Vec<&str> {
    items.iter().map(|t| t.name.as_str()).collect()
}

fn group_names(items: &[TenantGroup]) -> Vec<&str> {
    items.iter().map(|g| g.name.as_str()).collect()
}

struct Fixture {
    auth_group: Uuid,
    direct_user: Uuid,
    hosting: TenantGroup,
    internal: TenantGroup,
    acme: Tenant,
    globex: Tenant,
    freestanding: Tenant,
}

/// Two groups — one granting access via an auth group, one via a direct
/// user entry — plus a grouped tenant each and one ungrouped tenant.
async fn fixture(db: &Surreal<Db>) -> Fixture {
    let groups = SurrealTenantGroupRepository::new(db.clone());
    let tenants = SurrealTenantRepository::new(db.clone());

    let auth_group = Uuid::new_v4();
    let direct_user = Uuid::new_v4();

    let hosting = groups
        .create(CreateTenantGroup {
            name: "Hosting".into(),
            slug: "hosting".into(),
            access_groups: BTreeSet::from([auth_group]),
            access_users: BTreeSet::new(),
        })
        .await
        .unwrap();

    let internal = groups
        .create(CreateTenantGroup {
            name: "Internal".into(),
            slug: "internal".into(),
            access_groups: BTreeSet::new(),
            access_users: BTreeSet::from([direct_user]),
        })
        .await
        .unwrap();

    let acme = tenants
        .create(CreateTenant {
            name: "Acme".into(),
            slug: "acme".into(),
            group_id: Some(hosting.id),
            description: "Hosting customer".into(),
            comments: String::new(),
        })
        .await
        .unwrap();

    let globex = tenants
        .create(CreateTenant {
            name: "Globex".into(),
            slug: "globex".into(),
            group_id: Some(internal.id),
            description: String::new(),
            comments: String::new(),
        })
        .await
        .unwrap();

    let freestanding = tenants
        .create(CreateTenant {
            name: "Freestanding".into(),
            slug: "freestanding".into(),
            group_id: None,
            description: String::new(),
            comments: String::new(),
        })
        .await
        .unwrap();

    Fixture {
        auth_group,
        direct_user,
        hosting,
        internal,
        acme,
        globex,
        freestanding,
    }
}

#[tokio::test]
async fn member_sees_only_group_accessible_tenants() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let groups = SurrealTenantGroupRepository::new(db.clone());

    let page = RequestContext::scope(principal_in(&[fx.auth_group]), async {
        tenants.list(ListOptions::scoped()).await
    })
    .await
    .unwrap();
    assert_eq!(tenant_names(&page.items), ["Acme"]);
    assert_eq!(page.total, 1);

    let page = RequestContext::scope(principal_in(&[fx.auth_group]), async {
        groups.list(ListOptions::scoped()).await
    })
    .await
    .unwrap();
    assert_eq!(group_names(&page.items), ["Hosting"]);
}

#[tokio::test]
async fn access_user_entry_grants_access() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let groups = SurrealTenantGroupRepository::new(db.clone());

    let page = RequestContext::scope(principal_with_id(fx.direct_user), async {
        tenants.list(ListOptions::scoped()).await
    })
    .await
    .unwrap();
    assert_eq!(tenant_names(&page.items), ["Globex"]);

    let page = RequestContext::scope(principal_with_id(fx.direct_user), async {
        groups.list(ListOptions::scoped()).await
    })
    .await
    .unwrap();
    assert_eq!(group_names(&page.items), ["Internal"]);
}

#[tokio::test]
async fn superuser_scoped_matches_unscoped() {
    let db = setup().await;
    let _fx = fixture(&db).await;
    let tenants = SurrealTenantRepository::new(db.clone());

    let scoped = RequestContext::scope(superuser(), async {
        tenants.list(ListOptions::scoped()).await
    })
    .await
    .unwrap();
    let unscoped = tenants.list(ListOptions::default()).await.unwrap();

    assert_eq!(scoped.total, 3);
    assert_eq!(tenant_names(&scoped.items), tenant_names(&unscoped.items));
}

#[tokio::test]
async fn anonymous_scoped_list_is_empty_not_an_error() {
    let db = setup().await;
    let _fx = fixture(&db).await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let groups = SurrealTenantGroupRepository::new(db.clone());

    // No RequestContext scope: the current principal is anonymous.
    let page = tenants.list(ListOptions::scoped()).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);

    let page = groups.list(ListOptions::scoped()).await.unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn unaffiliated_principal_sees_nothing() {
    let db = setup().await;
    let _fx = fixture(&db).await;
    let tenants = SurrealTenantRepository::new(db.clone());

    let page = RequestContext::scope(principal_in(&[Uuid::new_v4()]), async {
        tenants.list(ListOptions::scoped()).await
    })
    .await
    .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn inaccessible_slug_lookup_reports_not_found() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let tenants = SurrealTenantRepository::new(db.clone());

    RequestContext::scope(principal_in(&[fx.auth_group]), async {
        // In scope: resolves.
        let acme = tenants.get_by_slug("acme").await.unwrap();
        assert_eq!(acme.id, fx.acme.id);

        // Out of scope and genuinely missing are indistinguishable.
        let inaccessible = tenants.get_by_slug("globex").await.unwrap_err();
        let missing = tenants.get_by_slug("no-such-tenant").await.unwrap_err();
        assert!(matches!(
            inaccessible,
            NetgridError::NotFound { ref entity, .. } if entity == "tenant"
        ));
        assert!(matches!(
            missing,
            NetgridError::NotFound { ref entity, .. } if entity == "tenant"
        ));
    })
    .await;
}

#[tokio::test]
async fn superuser_sees_any_slug() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let tenants = SurrealTenantRepository::new(db.clone());

    RequestContext::scope(superuser(), async {
        assert_eq!(tenants.get_by_slug("globex").await.unwrap().id, fx.globex.id);
        assert_eq!(
            tenants.get_by_slug("freestanding").await.unwrap().id,
            fx.freestanding.id,
        );
    })
    .await;
}

#[tokio::test]
async fn deleting_group_detaches_tenants() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let groups = SurrealTenantGroupRepository::new(db.clone());
    let tenants = SurrealTenantRepository::new(db.clone());

    groups.delete(fx.hosting.id).await.unwrap();

    // The group is gone; its tenant survives, detached.
    let err = groups.get_by_id(fx.hosting.id).await.unwrap_err();
    assert!(matches!(err, NetgridError::NotFound { .. }));

    let acme = tenants.get_by_id(fx.acme.id).await.unwrap();
    assert_eq!(acme.group_id, None);

    // Unrelated tenants keep their group.
    let globex = tenants.get_by_id(fx.globex.id).await.unwrap();
    assert_eq!(globex.group_id, Some(fx.internal.id));
    assert_eq!(
        tenants.get_by_id(fx.freestanding.id).await.unwrap().group_id,
        None,
    );
}

#[tokio::test]
async fn update_sets_and_clears_group_reference() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let tenants = SurrealTenantRepository::new(db.clone());

    let moved = tenants
        .update(
            fx.freestanding.id,
            UpdateTenant {
                group_id: Some(Some(fx.internal.id)),
                ..UpdateTenant::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.group_id, Some(fx.internal.id));

    let cleared = tenants
        .update(
            fx.acme.id,
            UpdateTenant {
                group_id: Some(None),
                description: Some("Detached".into()),
                ..UpdateTenant::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.group_id, None);
    assert_eq!(cleared.description, "Detached");
}

#[tokio::test]
async fn access_list_updates_change_visibility() {
    let db = setup().await;
    let fx = fixture(&db).await;
    let groups = SurrealTenantGroupRepository::new(db.clone());
    let tenants = SurrealTenantRepository::new(db.clone());

    let newcomer = principal_in(&[Uuid::new_v4()]);
    let newcomer_group = newcomer.group_memberships.iter().next().copied().unwrap();

    let page = RequestContext::scope(newcomer.clone(), async {
        tenants.list(ListOptions::scoped()).await
    })
    .await
    .unwrap();
    assert!(page.items.is_empty());

    groups
        .update(
            fx.hosting.id,
            UpdateTenantGroup {
                access_groups: Some(BTreeSet::from([newcomer_group])),
                ..UpdateTenantGroup::default()
            },
        )
        .await
        .unwrap();

    let page = RequestContext::scope(newcomer, async {
        tenants.list(ListOptions::scoped()).await
    })
    .await
    .unwrap();
    assert_eq!(tenant_names(&page.items), ["Acme"]);
}
