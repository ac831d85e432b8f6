//! End-to-end mapping scenarios through the public API.

use std::sync::Arc;

use objmap::{
    mappable, Direction, MapDirective, MapHooks, MappingConfig, MapperRegistry, MemberDecision,
    StrategyKind,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Order {
    id: i64,
    customer: Customer,
    total: f64,
    tags: Vec<String>,
}

mappable! {
    Order {
        id: i64,
        customer: Customer,
        total: f64,
        tags: Vec<String>,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Customer {
    name: String,
    email: String,
}

mappable! {
    Customer {
        name: String,
        email: String,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct OrderSummary {
    id: String,
    customer_name: String,
    total: i64,
    tags: Vec<String>,
    note: String,
}

mappable! {
    OrderSummary {
        id: String,
        customer_name: String,
        total: i64,
        tags: Vec<String>,
        note: String,
    }
    directives [
        MapDirective::new("note", "Order", "id", Direction::ToSource),
    ]
}

#[derive(Debug, Default, Clone, PartialEq)]
struct CustomerView {
    name: String,
}

mappable! {
    CustomerView {
        name: String,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct OrderView {
    id: i64,
    customer: CustomerView,
}

mappable! {
    OrderView {
        id: i64,
        customer: CustomerView,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Profile {
    nickname: Option<String>,
    score: Option<i64>,
}

mappable! {
    Profile {
        nickname: Option<String>,
        score: Option<i64>,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct ProfileView {
    nickname: Option<String>,
    score: i64,
}

mappable! {
    ProfileView {
        nickname: Option<String>,
        score: i64,
    }
}

fn sample_order() -> Order {
    Order {
        id: 7,
        customer: Customer {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        },
        total: 19.5,
        tags: vec!["new".to_string(), "rush".to_string()],
    }
}

#[test]
fn convention_covers_coercion_and_flattening() {
    let registry = MapperRegistry::with_defaults();
    let mapper = registry.resolve::<Order, OrderSummary>().unwrap();

    let order = sample_order();
    let summary = mapper.map(&order).unwrap();
    assert_eq!(summary.id, "7");
    assert_eq!(summary.customer_name, "Ada");
    assert_eq!(summary.total, 19); // truncation, not rounding
    assert_eq!(summary.tags, order.tags);
    // The target-side directive pulls Order.id into the note.
    assert_eq!(summary.note, "7");
}

#[test]
fn manual_rule_wins_over_convention() {
    let registry = MapperRegistry::with_defaults();
    let mapper = registry.resolve::<Order, OrderSummary>().unwrap();
    mapper
        .add_action(
            "id",
            "id",
            Box::new(|o: &Order, s: &mut OrderSummary| {
                s.id = format!("order-{}", o.id);
                Ok(())
            }),
        )
        .unwrap();

    let summary = mapper.map(&sample_order()).unwrap();
    assert_eq!(summary.id, "order-7");
    assert_eq!(summary.customer_name, "Ada");
}

#[test]
fn configured_pairs_override_convention() {
    let config = MappingConfig::from_yaml(
        r#"
mappings:
  "Order->OrderSummary":
    - source: customer
      target: note
"#,
    )
    .unwrap();
    let registry = MapperRegistry::new(objmap::default_order(), Some(Arc::new(config))).unwrap();
    let mapper = registry.resolve::<Order, OrderSummary>().unwrap();

    // Configured flattening: customer -> note has no sub-member match, so
    // the strict configured rule fails the mapping.
    assert!(mapper.map(&sample_order()).is_err());
}

#[test]
fn hooks_can_skip_members() {
    let registry = MapperRegistry::with_defaults();
    let mapper = registry.resolve::<Order, OrderSummary>().unwrap();

    let hooks = MapHooks::new().on_before(|ctx| {
        if ctx.target_member == "customer_name" {
            MemberDecision::Skip
        } else {
            MemberDecision::Proceed
        }
    });

    let mut summary = OrderSummary::default();
    mapper.map_with(&sample_order(), &mut summary, &hooks).unwrap();
    assert_eq!(summary.customer_name, "");
    assert_eq!(summary.id, "7");
}

#[test]
fn nested_pair_registration_enables_object_mapping() {
    let registry = MapperRegistry::with_defaults();
    registry.register_nested::<Customer, CustomerView>();

    let mapper = registry.resolve::<Order, OrderView>().unwrap();
    let order = sample_order();
    let view = mapper.map(&order).unwrap();
    assert_eq!(view.id, 7);
    assert_eq!(view.customer.name, "Ada");
}

#[test]
fn association_order_extends_convention() {
    let registry = MapperRegistry::new(vec![StrategyKind::Association], None).unwrap();
    registry.register_nested::<Customer, CustomerView>();

    let mapper = registry.resolve::<Order, OrderView>().unwrap();
    let order = sample_order();
    let view = mapper.map(&order).unwrap();
    // Nested members delegate to the registered inner mapper; plain
    // members still map by convention.
    assert_eq!(view.customer.name, "Ada");
    assert_eq!(view.id, order.id);
}

#[test]
fn map_all_performs_work_only_for_the_consumed_prefix() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let registry = MapperRegistry::with_defaults();
    let mapper = registry.resolve::<Order, OrderSummary>().unwrap();

    let mapped = Arc::new(AtomicUsize::new(0));
    let counter = mapped.clone();
    mapper
        .add_action(
            "id",
            "note",
            Box::new(move |_: &Order, s: &mut OrderSummary| {
                counter.fetch_add(1, Ordering::SeqCst);
                s.note = "seen".to_string();
                Ok(())
            }),
        )
        .unwrap();

    let orders = vec![sample_order(), Order::default(), sample_order()];
    let mut results = mapper.map_all(&orders);

    assert_eq!(mapped.load(Ordering::SeqCst), 0);
    assert_eq!(results.next().unwrap().unwrap().customer_name, "Ada");
    assert_eq!(mapped.load(Ordering::SeqCst), 1);
    assert_eq!(results.next().unwrap().unwrap().customer_name, "");
    assert_eq!(mapped.load(Ordering::SeqCst), 2);
    assert!(results.next().is_some());
    assert!(results.next().is_none());
    assert_eq!(mapped.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn map_async_runs_off_the_executor() {
    let registry = MapperRegistry::with_defaults();
    let mapper = registry.resolve::<Order, OrderSummary>().unwrap();
    let summary = mapper.clone().map_async(sample_order()).await.unwrap();
    assert_eq!(summary.id, "7");
}

#[test]
fn optional_members_map_on_both_sides() {
    let registry = MapperRegistry::with_defaults();
    let mapper = registry.resolve::<Profile, ProfileView>().unwrap();

    let profile = Profile {
        nickname: Some("ace".to_string()),
        score: Some(9),
    };
    let view = mapper.map(&profile).unwrap();
    assert_eq!(view.nickname.as_deref(), Some("ace"));
    assert_eq!(view.score, 9);
}

#[test]
fn none_member_writes_none_into_nullable_target() {
    let registry = MapperRegistry::with_defaults();
    let mapper = registry.resolve::<Profile, ProfileView>().unwrap();

    let profile = Profile {
        nickname: None,
        score: Some(1),
    };
    let mut view = ProfileView {
        nickname: Some("stale".to_string()),
        score: 0,
    };
    // The null is written through, not skipped.
    mapper.map_into(&profile, &mut view).unwrap();
    assert_eq!(view.nickname, None);
    assert_eq!(view.score, 1);
}

#[test]
fn none_member_fails_for_non_nullable_target() {
    let registry = MapperRegistry::with_defaults();
    let mapper = registry.resolve::<Profile, ProfileView>().unwrap();

    let profile = Profile {
        nickname: Some("ace".to_string()),
        score: None,
    };
    let err = mapper.map(&profile).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("score -> score"));
    assert!(msg.contains("null"));
}

#[test]
fn mapping_failure_identifies_the_member_pair() {
    let registry = MapperRegistry::with_defaults();
    let mapper = registry.resolve::<OrderSummary, Order>().unwrap();

    let summary = OrderSummary {
        id: "not-a-number".to_string(),
        ..OrderSummary::default()
    };
    let err = mapper.map(&summary).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("OrderSummary -> Order"));
    assert!(msg.contains("id -> id"));
}
