//! Integration tests for the generic scoped repository: natural
//! ordering, configuration errors, inventory scoping, and statistics.

use std::collections::BTreeSet;

use netgrid_core::context::RequestContext;
use netgrid_core::error::NetgridError;
use netgrid_core::models::inventory::{Rack, Site};
use netgrid_core::models::principal::Principal;
use netgrid_core::models::tenant::{CreateTenant, CreateTenantGroup, Tenant};
use netgrid_core::repository::{ListOptions, Pagination, TenantGroupRepository, TenantRepository};
use netgrid_db::repository::{ScopedRepository, SurrealTenantGroupRepository, SurrealTenantRepository};
use netgrid_db::{TenantStats, run_migrations, tenant_stats};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();
    db
}

fn natural_by(fields: &[&str]) -> ListOptions {
    ListOptions {
        natural_order_by: fields.iter().map(|f| f.to_string()).collect(),
        ..ListOptions::default()
    }
}

async fn create_tenant(db: &Surreal<Db>, name: &str, slug: &str, group_id: Option<Uuid>) -> Tenant {
    SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: name.into(),
            slug: slug.into(),
            group_id,
            description: String::new(),
            comments: String::new(),
        })
        .await
        .unwrap()
}

async fn create_site(db: &Surreal<Db>, name: &str, slug: &str, tenant_id: Option<Uuid>) -> Uuid {
    let id = Uuid::new_v4();
    db.query(
        "CREATE type::record('site', $id) SET name = $name, \
         slug = $slug, tenant_id = $tenant_id, description = ''",
    )
    .bind(("id", id.to_string()))
    .bind(("name", name.to_string()))
    .bind(("slug", slug.to_string()))
    .bind(("tenant_id", tenant_id.map(|t| t.to_string())))
    .await
    .unwrap()
    .check()
    .unwrap();
    id
}

async fn create_rack(db: &Surreal<Db>, site_id: Uuid, name: &str, tenant_id: Option<Uuid>) {
    db.query(
        "CREATE type::record('rack', $id) SET site_id = $site_id, \
         name = $name, tenant_id = $tenant_id, u_height = 42",
    )
    .bind(("id", Uuid::new_v4().to_string()))
    .bind(("site_id", site_id.to_string()))
    .bind(("name", name.to_string()))
    .bind(("tenant_id", tenant_id.map(|t| t.to_string())))
    .await
    .unwrap()
    .check()
    .unwrap();
}

async fn create_device(db: &Surreal<Db>, site_id: Uuid, name: &str, tenant_id: Option<Uuid>) {
    db.query(
        "CREATE type::record('device', $id) SET name = $name, \
         site_id = $site_id, rack_id = NONE, tenant_id = $tenant_id",
    )
    .bind(("id", Uuid::new_v4().to_string()))
    .bind(("name", name.to_string()))
    .bind(("site_id", site_id.to_string()))
    .bind(("tenant_id", tenant_id.map(|t| t.to_string())))
    .await
    .unwrap()
    .check()
    .unwrap();
}

#[tokio::test]
async fn racks_sort_naturally_by_name() {
    let db = setup().await;
    let site = create_site(&db, "DC One", "dc-one", None).await;
    for name in ["Rack 2", "Rack 10", "Rack 1a", "Rack"] {
        create_rack(&db, site, name, None).await;
    }

    let racks: ScopedRepository<Db, Rack> = ScopedRepository::new(db.clone());
    let page = racks.list(&natural_by(&["name"])).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|r| r.name.as_str()).collect();

    // Non-numeric middles drive placement before trailing integers:
    // "Rack 1a" keeps its digits in the middle part and sorts last.
    assert_eq!(names, ["Rack", "Rack 2", "Rack 10", "Rack 1a"]);
    assert_eq!(page.total, 4);
}

#[tokio::test]
async fn natural_order_paginates_after_sorting() {
    let db = setup().await;
    let site = create_site(&db, "DC One", "dc-one", None).await;
    for name in ["Rack 2", "Rack 10", "Rack 1a", "Rack"] {
        create_rack(&db, site, name, None).await;
    }

    let racks: ScopedRepository<Db, Rack> = ScopedRepository::new(db.clone());
    let opts = ListOptions {
        natural_order_by: vec!["name".into()],
        pagination: Pagination {
            offset: 1,
            limit: 2,
        },
        ..ListOptions::default()
    };
    let page = racks.list(&opts).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(names, ["Rack 2", "Rack 10"]);
    assert_eq!(page.total, 4);
    assert_eq!(page.offset, 1);
}

#[tokio::test]
async fn numeric_tenant_names_sort_by_value() {
    let db = setup().await;
    create_tenant(&db, "10", "t10", None).await;
    create_tenant(&db, "2", "t2", None).await;
    create_tenant(&db, "1", "t1", None).await;

    let tenants = SurrealTenantRepository::new(db.clone());
    let page = tenants.list(natural_by(&["name"])).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|t| t.name.as_str()).collect();

    assert_eq!(names, ["1", "2", "10"]);
}

#[tokio::test]
async fn leading_fields_order_before_the_natural_field() {
    let db = setup().await;
    create_site(&db, "Site 10", "beta", None).await;
    create_site(&db, "Site 2", "beta-two", None).await;
    create_site(&db, "Annex", "alpha", None).await;

    let sites: ScopedRepository<Db, Site> = ScopedRepository::new(db.clone());
    let page = sites.list(&natural_by(&["slug", "name"])).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|s| s.name.as_str()).collect();

    // Lexicographic slug first, then natural name.
    assert_eq!(names, ["Annex", "Site 10", "Site 2"]);
}

#[tokio::test]
async fn unknown_order_field_is_a_configuration_error() {
    let db = setup().await;
    let racks: ScopedRepository<Db, Rack> = ScopedRepository::new(db.clone());

    let err = racks.list(&natural_by(&["u_height"])).await.unwrap_err();
    assert!(matches!(err, NetgridError::Config { .. }));

    // Checked before scoping: even an anonymous scoped call fails fast.
    let opts = ListOptions {
        scoped: true,
        natural_order_by: vec!["comments".into()],
        ..ListOptions::default()
    };
    let err = racks.list(&opts).await.unwrap_err();
    assert!(matches!(err, NetgridError::Config { .. }));
}

#[tokio::test]
async fn inventory_scoping_follows_the_tenant_reference() {
    let db = setup().await;
    let groups = SurrealTenantGroupRepository::new(db.clone());

    let auth_group = Uuid::new_v4();
    let hosting = groups
        .create(CreateTenantGroup {
            name: "Hosting".into(),
            slug: "hosting".into(),
            access_groups: BTreeSet::from([auth_group]),
            access_users: BTreeSet::new(),
        })
        .await
        .unwrap();

    let acme = create_tenant(&db, "Acme", "acme", Some(hosting.id)).await;
    let solo = create_tenant(&db, "Solo", "solo", None).await;

    create_site(&db, "Acme DC", "acme-dc", Some(acme.id)).await;
    create_site(&db, "Solo DC", "solo-dc", Some(solo.id)).await;
    create_site(&db, "Shared Core", "shared-core", None).await;

    let sites: ScopedRepository<Db, Site> = ScopedRepository::new(db.clone());

    let member = Principal {
        id: Some(Uuid::new_v4()),
        username: "alice".into(),
        group_memberships: BTreeSet::from([auth_group]),
        ..Principal::anonymous()
    };
    let page = RequestContext::scope(member, async {
        sites.list(&ListOptions::scoped()).await
    })
    .await
    .unwrap();
    let names: Vec<&str> = page.items.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Acme DC"]);

    // Anonymous never raises, always empty.
    let page = sites.list(&ListOptions::scoped()).await.unwrap();
    assert!(page.items.is_empty());

    // Superusers see everything, including untenanted inventory.
    let root = Principal {
        id: Some(Uuid::new_v4()),
        username: "root".into(),
        is_superuser: true,
        ..Principal::anonymous()
    };
    let page = RequestContext::scope(root, async {
        sites.list(&ListOptions::scoped()).await
    })
    .await
    .unwrap();
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn tenant_stats_count_related_inventory() {
    let db = setup().await;
    let acme = create_tenant(&db, "Acme", "acme", None).await;
    let other = create_tenant(&db, "Other", "other", None).await;

    let dc = create_site(&db, "Acme DC", "acme-dc", Some(acme.id)).await;
    create_rack(&db, dc, "Rack 1", Some(acme.id)).await;
    create_rack(&db, dc, "Rack 2", Some(acme.id)).await;
    create_device(&db, dc, "edge-router", Some(acme.id)).await;
    create_device(&db, dc, "spare-switch", Some(other.id)).await;

    let stats = tenant_stats(&db, acme.id).await.unwrap();
    assert_eq!(
        stats,
        TenantStats {
            site_count: 1,
            rack_count: 2,
            device_count: 1,
        },
    );

    let stats = tenant_stats(&db, other.id).await.unwrap();
    assert_eq!(stats.site_count, 0);
    assert_eq!(stats.device_count, 1);
}
