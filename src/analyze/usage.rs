use crate::types::config::UsagePolicy;
use crate::types::report::{sort_recommendations, Category, Recommendation};
use crate::types::usage::EntityUsage;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedundancyCluster {
    pub members: Vec<String>,
    pub reason: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageInsights {
    pub most_used: Vec<String>,
    pub least_used: Vec<String>,
    pub redundancy: Vec<RedundancyCluster>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageAnalysis {
    pub insights: UsageInsights,
    pub recommendations: Vec<Recommendation>,
}

pub fn analyze(entities: &BTreeMap<String, EntityUsage>, policy: &UsagePolicy) -> UsageInsights {
    let mut ranked = entities
        .iter()
        .filter(|(_, usage)| usage.invocations > 0)
        .collect::<Vec<_>>();
    // BTreeMap order makes id the tie-break.
    ranked.sort_by(|a, b| b.1.invocations.cmp(&a.1.invocations));
    let most_used = ranked
        .into_iter()
        .take(policy.most_used_limit)
        .map(|(id, _)| id.clone())
        .collect();

    let least_used = entities
        .iter()
        .filter(|(_, usage)| usage.invocations == 0)
        .map(|(id, _)| id.clone())
        .collect();

    let redundancy = policy
        .families
        .iter()
        .filter_map(|family| {
            let members = entities
                .iter()
                .filter(|(id, usage)| {
                    id.starts_with(&family.prefix) && usage.invocations < family.below
                })
                .map(|(id, _)| id.clone())
                .collect::<Vec<_>>();
            (members.len() >= family.min_members).then(|| RedundancyCluster {
                members,
                reason: family.reason.clone(),
                suggestion: family.suggestion.clone(),
            })
        })
        .collect();

    UsageInsights {
        most_used,
        least_used,
        redundancy,
    }
}

pub fn recommend(
    entities: &BTreeMap<String, EntityUsage>,
    insights: &UsageInsights,
    policy: &UsagePolicy,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if !insights.least_used.is_empty() {
        recommendations.push(Recommendation::new(
            Category::Cleanup,
            format!("{} entries never used", insights.least_used.len()),
            "Review for deprecation or better promotion",
            insights.least_used.clone(),
        ));
    }

    for cluster in &insights.redundancy {
        recommendations.push(Recommendation::new(
            Category::Consolidation,
            cluster.reason.clone(),
            cluster.suggestion.clone(),
            cluster.members.clone(),
        ));
    }

    for advisor in &policy.advisors {
        let Some(usage) = entities.get(advisor) else {
            continue;
        };
        if usage.recommendations_made > 0 && usage.adoption_rate < policy.adoption_threshold {
            recommendations.push(Recommendation::new(
                Category::Adoption,
                format!(
                    "{advisor} recommendations only followed {:.0}% of time",
                    usage.adoption_rate * 100.0
                ),
                "Improve specificity of routing advice or reduce noise",
                vec![advisor.clone()],
            ));
        }
    }

    for (id, usage) in entities {
        if usage.invocations < policy.promotion_max_invocations
            && usage.success_rate > policy.promotion_success_threshold
        {
            recommendations.push(Recommendation::new(
                Category::Promotion,
                format!("{id} highly successful but rarely used"),
                "Better documentation or automatic suggestions",
                vec![id.clone()],
            ));
        }
    }

    sort_recommendations(&mut recommendations);
    recommendations
}

pub fn compute_recommendations(
    entities: &BTreeMap<String, EntityUsage>,
    policy: &UsagePolicy,
) -> UsageAnalysis {
    let insights = analyze(entities, policy);
    let recommendations = recommend(entities, &insights, policy);
    tracing::info!(
        entities = entities.len(),
        clusters = insights.redundancy.len(),
        recommendations = recommendations.len(),
        "usage analyzed"
    );
    UsageAnalysis {
        insights,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::Priority;
    use crate::types::usage::UsageState;

    fn entities(list: Vec<EntityUsage>) -> BTreeMap<String, EntityUsage> {
        UsageState::from_entities(list).entities
    }

    fn used(id: &str, invocations: u64) -> EntityUsage {
        EntityUsage::new(id).with_invocations(invocations)
    }

    #[test]
    fn local_family_forms_cluster_and_unused_are_listed() {
        let entities = entities(vec![
            used("/a", 0),
            used("/b", 0),
            used("/local-x", 3),
            used("/local-y", 2),
        ]);
        let insights = analyze(&entities, &UsagePolicy::default());

        assert_eq!(insights.least_used, vec!["/a", "/b"]);
        assert_eq!(insights.redundancy.len(), 1);
        assert_eq!(insights.redundancy[0].members, vec!["/local-x", "/local-y"]);
        assert_eq!(
            insights.redundancy[0].suggestion,
            "Merge into /delegate-auto with auto-routing"
        );
    }

    #[test]
    fn family_needs_minimum_members_below_threshold() {
        let entities = entities(vec![
            used("/local-x", 3),
            used("/local-y", 9),
            used("/process-a", 1),
            used("/process-b", 2),
        ]);
        let insights = analyze(&entities, &UsagePolicy::default());
        assert!(insights.redundancy.is_empty());

        let mut with_third = entities.clone();
        with_third.insert("/process-c".to_string(), used("/process-c", 0));
        let insights = analyze(&with_third, &UsagePolicy::default());
        assert_eq!(insights.redundancy.len(), 1);
        assert_eq!(
            insights.redundancy[0].members,
            vec!["/process-a", "/process-b", "/process-c"]
        );
    }

    #[test]
    fn most_used_takes_top_five_with_id_tie_break() {
        let entities = entities(vec![
            used("/f", 1),
            used("/e", 7),
            used("/d", 7),
            used("/c", 30),
            used("/b", 2),
            used("/a", 5),
            used("/zero", 0),
        ]);
        let insights = analyze(&entities, &UsagePolicy::default());
        assert_eq!(insights.most_used, vec!["/c", "/d", "/e", "/a", "/b"]);
    }

    #[test]
    fn recommendations_cover_every_signal_in_priority_order() {
        let mut route = used("/route", 40);
        route.recommendations_made = 20;
        route.adoption_rate = 0.25;
        let entities = entities(vec![
            used("/unused", 0),
            used("/local-a", 1),
            used("/local-b", 1),
            route,
            used("/gem", 3).with_success_rate(0.9),
        ]);

        let analysis = compute_recommendations(&entities, &UsagePolicy::default());
        let categories = analysis
            .recommendations
            .iter()
            .map(|recommendation| recommendation.category)
            .collect::<Vec<_>>();
        assert_eq!(
            categories,
            vec![
                Category::Adoption,
                Category::Consolidation,
                Category::Promotion,
                Category::Cleanup,
            ]
        );
        assert_eq!(analysis.recommendations[0].priority, Priority::High);
        assert!(analysis.recommendations[0].issue.contains("25%"));
        assert_eq!(analysis.recommendations[2].related_entities, vec!["/gem"]);
        assert_eq!(analysis.recommendations[3].priority, Priority::Low);
    }

    #[test]
    fn adoption_requires_recommendations_made() {
        let mut route = used("/route", 4);
        route.adoption_rate = 0.0;
        let entities = entities(vec![route]);
        let analysis = compute_recommendations(&entities, &UsagePolicy::default());
        assert!(analysis
            .recommendations
            .iter()
            .all(|recommendation| recommendation.category != Category::Adoption));
    }

    #[test]
    fn promotion_thresholds_are_strict() {
        let entities = entities(vec![
            used("/exact", 3).with_success_rate(0.8),
            used("/busy", 5).with_success_rate(1.0),
        ]);
        let analysis = compute_recommendations(&entities, &UsagePolicy::default());
        assert!(analysis.recommendations.is_empty());
    }
}
