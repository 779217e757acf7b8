mod helpers;

use ferrous_recursor_domain::{
    decode_message, encode_message, DnsQuery, DomainError, Message, RData, RecordType,
    ResponseCode, Server,
};
use ferrous_recursor_infrastructure::{IterativeResolver, ResolverConfig};
use helpers::replies::{answer_a, empty, glue_referral, ns_referral, soa_only};
use helpers::ScriptedExchange;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const ROOT_A: [u8; 4] = [10, 0, 0, 1];
const ROOT_B: [u8; 4] = [10, 0, 0, 2];
const TLD: [u8; 4] = [10, 0, 1, 1];
const AUTH: [u8; 4] = [10, 0, 2, 1];

fn root(name: &str, ip: [u8; 4]) -> Server {
    Server::new(name).with_ipv4(Ipv4Addr::from(ip))
}

fn ip(octets: [u8; 4]) -> IpAddr {
    IpAddr::from(octets)
}

fn resolver(exchange: Arc<ScriptedExchange>, roots: Vec<Server>) -> IterativeResolver {
    IterativeResolver::new(roots, exchange, ResolverConfig::default()).unwrap()
}

fn qname(query: &Message) -> &str {
    &query.questions[0].name
}

#[tokio::test]
async fn test_follows_glue_referrals_to_answer() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |_| glue_referral("com.", &[("a.gtld-servers.net.", TLD)]))
            .on(TLD, |_| glue_referral("example.com.", &[("ns1.example.com.", AUTH)]))
            .on(AUTH, |q| answer_a(qname(q), [93, 184, 216, 34], 300)),
    );
    let resolver = resolver(exchange.clone(), vec![root("a.root-servers.net.", ROOT_A)]);

    let reply = resolver
        .resolve(&DnsQuery::new("www.example.com", RecordType::A))
        .await
        .unwrap();

    assert_eq!(reply.response_code(), ResponseCode::NoError);
    assert_eq!(reply.answers.len(), 1);
    assert_eq!(
        reply.answers[0].rdata,
        RData::A(Ipv4Addr::new(93, 184, 216, 34))
    );
    assert_eq!(
        exchange.calls(),
        vec![
            (ip(ROOT_A), "www.example.com.".to_string()),
            (ip(TLD), "www.example.com.".to_string()),
            (ip(AUTH), "www.example.com.".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_ns_only_referral_is_resolved_against_referring_server() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |q| match qname(q) {
                "ns1.example.net." => answer_a("ns1.example.net.", AUTH, 600),
                _ => ns_referral("example.com.", &["ns1.example.net."]),
            })
            .on(AUTH, |q| answer_a(qname(q), [192, 0, 2, 80], 60)),
    );
    let resolver = resolver(exchange.clone(), vec![root("a.root-servers.net.", ROOT_A)]);

    let reply = resolver
        .resolve(&DnsQuery::new("example.com.", RecordType::A))
        .await
        .unwrap();

    assert_eq!(reply.answers[0].rdata, RData::A(Ipv4Addr::new(192, 0, 2, 80)));
    assert_eq!(
        exchange.calls(),
        vec![
            (ip(ROOT_A), "example.com.".to_string()),
            (ip(ROOT_A), "ns1.example.net.".to_string()),
            (ip(AUTH), "example.com.".to_string()),
        ]
    );

    let cached = resolver.cache().get("ns1.example.net.").unwrap();
    assert_eq!(cached.ipv4, Some(Ipv4Addr::from(AUTH)));
}

#[tokio::test]
async fn test_cached_nameserver_skips_address_lookup() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |q| match qname(q) {
                "ns1.example.net." => answer_a("ns1.example.net.", AUTH, 600),
                _ => ns_referral("example.com.", &["ns1.example.net."]),
            })
            .on(AUTH, |q| answer_a(qname(q), [192, 0, 2, 80], 60)),
    );
    let resolver = resolver(exchange.clone(), vec![root("a.root-servers.net.", ROOT_A)]);
    let query = DnsQuery::new("example.com.", RecordType::A);

    resolver.resolve(&query).await.unwrap();
    assert_eq!(exchange.call_count(), 3);

    resolver.resolve(&query).await.unwrap();
    assert_eq!(exchange.call_count(), 5);
    let lookups = exchange
        .calls()
        .iter()
        .filter(|(_, name)| name == "ns1.example.net.")
        .count();
    assert_eq!(lookups, 1);
}

#[tokio::test]
async fn test_zero_ttl_nameserver_is_not_cached() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |q| match qname(q) {
                "ns1.example.net." => answer_a("ns1.example.net.", AUTH, 0),
                _ => ns_referral("example.com.", &["ns1.example.net."]),
            })
            .on(AUTH, |q| answer_a(qname(q), [192, 0, 2, 80], 60)),
    );
    let resolver = resolver(exchange, vec![root("a.root-servers.net.", ROOT_A)]);

    resolver
        .resolve(&DnsQuery::new("example.com.", RecordType::A))
        .await
        .unwrap();

    assert!(resolver.cache().is_empty());
}

#[tokio::test]
async fn test_soa_only_authority_is_final() {
    let exchange = Arc::new(
        ScriptedExchange::new().on(ROOT_A, |_| soa_only("invalid.", 3)),
    );
    let resolver = resolver(exchange.clone(), vec![root("a.root-servers.net.", ROOT_A)]);

    let reply = resolver
        .resolve(&DnsQuery::new("nope.invalid.", RecordType::A))
        .await
        .unwrap();

    assert_eq!(reply.response_code(), ResponseCode::NxDomain);
    assert!(reply.answers.is_empty());
    assert_eq!(reply.nameservers.len(), 1);
    assert!(reply.nameservers[0].is_type(RecordType::SOA));
    assert_eq!(exchange.call_count(), 1);
}

#[tokio::test]
async fn test_nodata_soa_is_final_below_root() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |_| glue_referral("com.", &[("a.gtld-servers.net.", TLD)]))
            .on(TLD, |_| soa_only("example.com.", 0)),
    );
    let resolver = resolver(exchange.clone(), vec![root("a.root-servers.net.", ROOT_A)]);

    let reply = resolver
        .resolve(&DnsQuery::new("example.com.", RecordType::AAAA))
        .await
        .unwrap();

    assert_eq!(reply.response_code(), ResponseCode::NoError);
    assert_eq!(exchange.call_count(), 2);
}

#[tokio::test]
async fn test_endless_ns_referrals_hit_depth_bound() {
    let counter = Arc::new(AtomicUsize::new(0));
    let exchange = Arc::new(ScriptedExchange::new().on(ROOT_A, {
        let counter = counter.clone();
        move |_: &Message| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            ns_referral("example.", &[format!("ns{}.example.", n).as_str()])
        }
    }));
    let config = ResolverConfig::default();
    let max = config.max_recursion_depth;
    let resolver = IterativeResolver::new(
        vec![root("a.root-servers.net.", ROOT_A)],
        exchange.clone(),
        config,
    )
    .unwrap();

    let err = resolver
        .resolve(&DnsQuery::new("loop.example.", RecordType::A))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::RecursionDepthExceeded { max });
    assert_eq!(exchange.call_count(), max + 1);
}

#[tokio::test]
async fn test_cached_nameserver_used_when_sibling_lookup_is_too_deep() {
    let counter = Arc::new(AtomicUsize::new(0));
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, {
                let counter = counter.clone();
                move |q: &Message| match qname(q) {
                    "example.com." => {
                        ns_referral("example.com.", &["deep.loop.net.", "ns1.example.net."])
                    }
                    _ => {
                        let n = counter.fetch_add(1, Ordering::SeqCst);
                        ns_referral("loop.net.", &[format!("ns{}.loop.net.", n).as_str()])
                    }
                }
            })
            .on(AUTH, |q| answer_a(qname(q), [192, 0, 2, 80], 60)),
    );
    let resolver = IterativeResolver::new(
        vec![root("a.root-servers.net.", ROOT_A)],
        exchange.clone(),
        ResolverConfig::default().with_max_recursion_depth(2),
    )
    .unwrap();
    resolver.cache().put(
        Server::new("ns1.example.net.").with_ipv4(Ipv4Addr::from(AUTH)),
        Duration::from_secs(600),
    );

    let reply = resolver
        .resolve(&DnsQuery::new("example.com.", RecordType::A))
        .await
        .unwrap();

    assert_eq!(reply.answers[0].rdata, RData::A(Ipv4Addr::new(192, 0, 2, 80)));
    assert_eq!(exchange.calls().last().unwrap().0, ip(AUTH));
}

#[tokio::test]
async fn test_endless_glue_referrals_hit_depth_bound() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |_| glue_referral("example.", &[("ns.example.", TLD)]))
            .on(TLD, |_| glue_referral("example.", &[("ns.example.", TLD)])),
    );
    let config = ResolverConfig::default().with_max_recursion_depth(3);
    let resolver = IterativeResolver::new(
        vec![root("a.root-servers.net.", ROOT_A)],
        exchange.clone(),
        config,
    )
    .unwrap();

    let err = resolver
        .resolve(&DnsQuery::new("loop.example.", RecordType::A))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::RecursionDepthExceeded { max: 3 });
    assert_eq!(exchange.call_count(), 4);
}

#[tokio::test]
async fn test_empty_reply_moves_to_next_server() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |_| empty())
            .on(ROOT_B, |q| answer_a(qname(q), [192, 0, 2, 1], 300)),
    );
    let resolver = resolver(
        exchange.clone(),
        vec![
            root("a.root-servers.net.", ROOT_A),
            root("b.root-servers.net.", ROOT_B),
        ],
    );

    let reply = resolver
        .resolve(&DnsQuery::new("example.org.", RecordType::A))
        .await
        .unwrap();

    assert_eq!(reply.answers.len(), 1);
    let servers: Vec<IpAddr> = exchange.calls().into_iter().map(|(ip, _)| ip).collect();
    assert_eq!(servers, vec![ip(ROOT_A), ip(ROOT_B)]);
}

#[tokio::test]
async fn test_failing_and_malformed_servers_are_skipped() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on_raw(ROOT_B, vec![0xde, 0xad, 0xbe])
            .on(AUTH, |q| answer_a(qname(q), [192, 0, 2, 1], 300)),
    );
    let resolver = resolver(
        exchange.clone(),
        vec![
            // No address at all: filtered out at construction.
            Server::new("x.root-servers.net."),
            root("a.root-servers.net.", ROOT_A),
            root("b.root-servers.net.", ROOT_B),
            root("c.root-servers.net.", AUTH),
        ],
    );

    let reply = resolver
        .resolve(&DnsQuery::new("example.org.", RecordType::A))
        .await
        .unwrap();

    assert_eq!(reply.answers.len(), 1);
    assert_eq!(exchange.call_count(), 3);
}

#[tokio::test]
async fn test_all_servers_failing_is_an_error() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |_| empty())
            .on(ROOT_B, |_| empty()),
    );
    let resolver = resolver(
        exchange,
        vec![
            root("a.root-servers.net.", ROOT_A),
            root("b.root-servers.net.", ROOT_B),
        ],
    );

    let err = resolver
        .resolve(&DnsQuery::new("example.org.", RecordType::A))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::AllServersFailed { depth: 0 });
}

#[tokio::test]
async fn test_failed_referral_is_not_retried_elsewhere() {
    // ROOT_B would answer, but ROOT_A's referral is taken and its target is dead.
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |_| glue_referral("org.", &[("a0.org-servers.net.", TLD)]))
            .on(ROOT_B, |q| answer_a(qname(q), [192, 0, 2, 1], 300)),
    );
    let resolver = resolver(
        exchange,
        vec![
            root("a.root-servers.net.", ROOT_A),
            root("b.root-servers.net.", ROOT_B),
        ],
    );

    let err = resolver
        .resolve(&DnsQuery::new("example.org.", RecordType::A))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::AllServersFailed { depth: 1 });
}

#[tokio::test]
async fn test_unresolvable_ns_referral_moves_to_next_server() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |q| match qname(q) {
                "ns1.example.net." => soa_only("example.net.", 3),
                _ => ns_referral("example.com.", &["ns1.example.net."]),
            })
            .on(ROOT_B, |q| answer_a(qname(q), [192, 0, 2, 9], 300)),
    );
    let resolver = resolver(
        exchange.clone(),
        vec![
            root("a.root-servers.net.", ROOT_A),
            root("b.root-servers.net.", ROOT_B),
        ],
    );

    let reply = resolver
        .resolve(&DnsQuery::new("example.com.", RecordType::A))
        .await
        .unwrap();

    assert_eq!(reply.answers[0].rdata, RData::A(Ipv4Addr::new(192, 0, 2, 9)));
    assert_eq!(exchange.call_count(), 3);
}

#[tokio::test]
async fn test_root_selection_rotates() {
    let exchange = Arc::new(
        ScriptedExchange::new()
            .on(ROOT_A, |q| answer_a(qname(q), [192, 0, 2, 1], 300))
            .on(ROOT_B, |q| answer_a(qname(q), [192, 0, 2, 2], 300)),
    );
    let resolver = resolver(
        exchange.clone(),
        vec![
            root("a.root-servers.net.", ROOT_A),
            root("b.root-servers.net.", ROOT_B),
        ],
    );
    let query = DnsQuery::new("example.org.", RecordType::A);

    for _ in 0..3 {
        resolver.resolve(&query).await.unwrap();
    }

    let servers: Vec<IpAddr> = exchange.calls().into_iter().map(|(ip, _)| ip).collect();
    assert_eq!(servers, vec![ip(ROOT_A), ip(ROOT_B), ip(ROOT_A)]);
}

#[tokio::test]
async fn test_resolve_raw_returns_server_bytes() {
    let exchange = Arc::new(
        ScriptedExchange::new().on(ROOT_A, |q| answer_a(qname(q), [192, 0, 2, 1], 300)),
    );
    let resolver = resolver(exchange, vec![root("a.root-servers.net.", ROOT_A)]);

    let query = encode_message(&Message::query(0x4242, "example.org.", RecordType::A, false)).unwrap();
    let reply = resolver.resolve_raw(&query).await.unwrap();

    let decoded = decode_message(&reply).unwrap();
    assert_eq!(decoded.id(), 0x4242);
    assert!(decoded.header.flags.response);
    assert_eq!(decoded.questions[0].name, "example.org.");
}

#[tokio::test]
async fn test_resolve_raw_rejects_short_query() {
    let exchange = Arc::new(ScriptedExchange::new());
    let resolver = resolver(exchange.clone(), vec![root("a.root-servers.net.", ROOT_A)]);

    assert!(resolver.resolve_raw(&[0x00, 0x01]).await.is_err());
    assert_eq!(exchange.call_count(), 0);
}

#[test]
fn test_no_usable_roots_is_an_error() {
    let exchange = Arc::new(ScriptedExchange::new());
    let result = IterativeResolver::new(
        vec![Server::new("a.root-servers.net.")],
        exchange,
        ResolverConfig::default(),
    );
    assert!(matches!(result, Err(DomainError::NoRootServersFound)));
}
