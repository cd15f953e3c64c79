#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::collections::BTreeMap;

use geo::{Coord, coord};
use proptest::prelude::*;
use swarm::simulation::agent::AgentId;
use swarm::simulation::geometry::WorldBounds;
use swarm::simulation::group::{Group, Groups};
use swarm::simulation::spatial::{DEFAULT_CAPACITY, IndexStrategy};
use swarm::simulation::subscription::Subscriptions;

fn bounds() -> WorldBounds {
    WorldBounds::from_size(800.0, 600.0)
}

fn positions(points: &[(f64, f64)]) -> BTreeMap<AgentId, Coord<f64>> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| (AgentId(i), coord! { x: x, y: y }))
        .collect()
}

fn group_of(strategy: IndexStrategy, source: &BTreeMap<AgentId, Coord<f64>>) -> Group {
    let ids: Vec<AgentId> = source.keys().copied().collect();
    Group::with_members("test", strategy, bounds(), &ids, source).expect("group")
}

fn all_strategies() -> [IndexStrategy; 3] {
    [
        IndexStrategy::Linear,
        IndexStrategy::QuadTree {
            capacity: DEFAULT_CAPACITY,
        },
        IndexStrategy::KdTree,
    ]
}

#[test]
fn test_three_agents_end_to_end() {
    let source = positions(&[(0.0, 0.0), (10.0, 0.0), (100.0, 0.0)]);
    for strategy in all_strategies() {
        let group = group_of(strategy, &source);
        let origin = coord! { x: 0.0, y: 0.0 };

        let hit = group
            .find_nearest(origin, Some(AgentId(0)), None)
            .expect("a neighbor");
        assert_eq!(hit.id, AgentId(1));
        assert_eq!(hit.distance, 10.0);

        assert!(group.find_nearest(origin, Some(AgentId(0)), Some(5.0)).is_none());
    }
}

#[test]
fn test_never_returns_the_querying_member() {
    let source = positions(&[(5.0, 5.0), (5.0, 5.0), (400.0, 300.0)]);
    for strategy in all_strategies() {
        let group = group_of(strategy, &source);
        for (&id, &at) in &source {
            let hit = group.find_nearest(at, Some(id), None).expect("a neighbor");
            assert_ne!(hit.id, id, "{strategy:?}");
        }
    }
}

#[test]
fn test_lone_member_excluded_finds_nothing() {
    let source = positions(&[(5.0, 5.0)]);
    let group = group_of(IndexStrategy::Linear, &source);
    assert!(
        group
            .find_nearest(coord! { x: 5.0, y: 5.0 }, Some(AgentId(0)), None)
            .is_none()
    );
}

#[test]
fn test_empty_group_finds_nothing() {
    for strategy in all_strategies() {
        let group = Group::new("empty", strategy, bounds());
        assert!(group.is_empty());
        assert!(group.find_nearest(coord! { x: 1.0, y: 2.0 }, None, None).is_none());
        assert!(
            group
                .find_nearest(coord! { x: 1.0, y: 2.0 }, None, Some(1000.0))
                .is_none()
        );
    }
}

#[test]
fn test_insert_is_identity_unique() {
    let mut group = Group::new("g", IndexStrategy::Linear, bounds());
    assert!(group.insert(AgentId(3), coord! { x: 1.0, y: 1.0 }).expect("insert"));
    assert!(!group.insert(AgentId(3), coord! { x: 9.0, y: 9.0 }).expect("insert"));
    assert_eq!(group.size(), 1);
    assert_eq!(group.remove(AgentId(3)), Some(coord! { x: 1.0, y: 1.0 }));
    assert_eq!(group.remove(AgentId(3)), None);
    assert!(group.is_empty());
}

#[test]
fn test_refresh_picks_up_moves_and_drops_unknown_members() {
    let mut source = positions(&[(0.0, 0.0), (10.0, 0.0), (100.0, 0.0)]);
    for strategy in all_strategies() {
        let mut group = group_of(strategy, &source);
        assert!(!group.refresh(bounds(), &source).expect("refresh"));

        source.insert(AgentId(2), coord! { x: 1.0, y: 0.0 });
        source.remove(&AgentId(1));
        assert!(group.refresh(bounds(), &source).expect("refresh"));

        assert_eq!(group.size(), 2);
        assert!(!group.contains(AgentId(1)));
        let hit = group
            .find_nearest(coord! { x: 0.0, y: 0.0 }, Some(AgentId(0)), None)
            .expect("a neighbor");
        assert_eq!(hit.id, AgentId(2));
        assert_eq!(hit.distance, 1.0);

        source = positions(&[(0.0, 0.0), (10.0, 0.0), (100.0, 0.0)]);
    }
}

#[test]
fn test_refresh_rebuilds_on_resize() {
    let source = positions(&[(0.0, 0.0), (10.0, 0.0)]);
    let mut group = group_of(IndexStrategy::QuadTree { capacity: 1 }, &source);
    let larger = WorldBounds::from_size(1600.0, 1200.0);
    assert!(group.refresh(larger, &source).expect("refresh"));
    assert_eq!(group.bounds(), larger);
}

#[test]
fn test_k_nearest_returns_closest_first() {
    let source = positions(&[(0.0, 0.0), (30.0, 0.0), (10.0, 0.0), (20.0, 0.0), (700.0, 0.0)]);
    for strategy in all_strategies() {
        let mut group = group_of(strategy, &source);
        let hits = group.k_nearest(coord! { x: 0.0, y: 0.0 }, Some(AgentId(0)), 3, None);
        let ids: Vec<AgentId> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![AgentId(2), AgentId(3), AgentId(1)], "{strategy:?}");

        let bounded = group.k_nearest(coord! { x: 0.0, y: 0.0 }, Some(AgentId(0)), 3, Some(15.0));
        assert_eq!(bounded.len(), 1);
        assert_eq!(group.size(), 5);
    }
}

#[test]
fn test_roles_never_leak_between_groups() {
    let prey = positions(&[(500.0, 500.0)]);
    let attackers: BTreeMap<AgentId, Coord<f64>> =
        [(AgentId(1), coord! { x: 1.0, y: 1.0 })].into_iter().collect();

    let mut groups = Groups::new();
    let prey_id = groups.add(group_of(IndexStrategy::Linear, &prey));
    let attacker_id = groups.add(
        Group::with_members("attackers", IndexStrategy::Linear, bounds(), &[AgentId(1)], &attackers)
            .expect("group"),
    );

    let mut roles = Subscriptions::new();
    roles.subscribe("prey", prey_id);
    roles.subscribe("attacker", attacker_id);

    let me = AgentId(99);
    let origin = coord! { x: 0.0, y: 0.0 };
    let hit = roles
        .find_nearest_by_role(&groups, "prey", me, origin, None)
        .expect("prey");
    assert_eq!(hit.id, AgentId(0));

    assert!(roles.find_nearest_by_role(&groups, "unknown", me, origin, None).is_none());
    roles.unsubscribe("prey");
    assert!(roles.find_nearest_by_role(&groups, "prey", me, origin, None).is_none());
}

#[test]
fn test_subscribe_overwrites_previous_group() {
    let mut groups = Groups::new();
    let a = groups.add(Group::new("a", IndexStrategy::Linear, bounds()));
    let b = groups.add(Group::new("b", IndexStrategy::Linear, bounds()));

    let mut roles = Subscriptions::new();
    roles.subscribe("target", a);
    roles.subscribe("target", b);
    assert_eq!(roles.group_for("target"), Some(b));
    assert_eq!(roles.len(), 1);
    assert_eq!(groups.find("b").map(|(id, _)| id), Some(b));
}

#[test]
fn test_within_lists_members_closest_first() {
    let source = positions(&[(0.0, 0.0), (10.0, 0.0), (100.0, 0.0), (4.0, 0.0)]);
    for strategy in all_strategies() {
        let group = group_of(strategy, &source);
        let origin = coord! { x: 0.0, y: 0.0 };

        let hits = group.within(origin, Some(AgentId(0)), 50.0);
        let ids: Vec<AgentId> = hits.iter().map(|hit| hit.id).collect();
        assert_eq!(ids, vec![AgentId(3), AgentId(1)], "{strategy:?}");
        assert_eq!(hits[0].distance, 4.0);

        assert_eq!(group.within(origin, None, 100.0).len(), 4, "{strategy:?}");
        assert!(group.within(origin, None, -1.0).is_empty());
        assert!(group.within(origin, None, f64::NAN).is_empty());
    }
}

#[test]
fn test_within_by_role_follows_the_subscription() {
    let source = positions(&[(0.0, 0.0), (30.0, 40.0), (300.0, 400.0)]);
    let mut groups = Groups::new();
    let flock = groups.add(group_of(IndexStrategy::KdTree, &source));

    let mut roles = Subscriptions::new();
    let origin = coord! { x: 0.0, y: 0.0 };
    assert!(roles.within_by_role(&groups, "same", AgentId(0), origin, 1000.0).is_empty());

    roles.subscribe("same", flock);
    let hits = roles.within_by_role(&groups, "same", AgentId(0), origin, 50.0);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, AgentId(1));
    assert_eq!(hits[0].distance, 50.0);
}

#[test]
fn test_failed_refresh_keeps_previous_snapshot() {
    let mut source = positions(&[(10.0, 10.0), (20.0, 20.0)]);
    let mut group = group_of(IndexStrategy::KdTree, &source);

    source.insert(AgentId(0), coord! { x: f64::NAN, y: 10.0 });
    source.insert(AgentId(1), coord! { x: 500.0, y: 500.0 });
    assert!(group.refresh(bounds(), &source).is_err());

    let old = coord! { x: 20.0, y: 20.0 };
    let hit = group.find_nearest(old, None, Some(0.0)).expect("old snapshot");
    assert_eq!(hit.id, AgentId(1));
    assert_eq!(group.size(), 2);

    // Members and index still agree, so removal finds the indexed entry.
    assert_eq!(group.remove(AgentId(1)), Some(old));
    assert!(group.find_nearest(old, None, Some(0.0)).is_none());
    let rest = group.find_nearest(old, None, None).expect("remaining member");
    assert_eq!(rest.id, AgentId(0));
    assert_eq!(rest.position, coord! { x: 10.0, y: 10.0 });

    source.insert(AgentId(0), coord! { x: 30.0, y: 30.0 });
    assert_eq!(group.refresh(bounds(), &source).ok(), Some(true));
    assert_eq!(
        group.find_nearest(old, None, None).map(|hit| hit.position),
        Some(coord! { x: 30.0, y: 30.0 })
    );
}

proptest! {
    #[test]
    fn prop_k_nearest_restores_membership(
        points in prop::collection::vec((0.0..800.0f64, 0.0..600.0f64), 1..40),
        k in 0usize..10,
        strategy in prop::sample::select(all_strategies().to_vec()),
    ) {
        let source = positions(&points);
        let mut group = group_of(strategy, &source);
        let before: Vec<AgentId> = group.members().collect();

        let hits = group.k_nearest(coord! { x: 400.0, y: 300.0 }, Some(AgentId(0)), k, None);

        prop_assert_eq!(hits.len(), k.min(points.len() - 1));
        prop_assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        prop_assert_eq!(group.members().collect::<Vec<_>>(), before);
        prop_assert_eq!(group.size(), points.len());
        // Every member is still reachable through the index.
        for (&id, &at) in &source {
            let hit = group.find_nearest(at, None, Some(0.0));
            prop_assert!(hit.is_some_and(|h| h.distance == 0.0), "lost {:?}", id);
        }
    }
}
