//! Rule to check listener protocols and certificates on load balancers.
//!
//! # Checks
//!
//! For `AWS::ElasticLoadBalancingV2::Listener` resources and for every entry
//! of `Listeners` on `AWS::ElasticLoadBalancing::LoadBalancer` resources:
//!
//! - `Protocol` must be one of the protocols supported by that resource kind.
//! - A secure protocol (HTTPS, and SSL for classic load balancers) needs a
//!   certificate.
//!
//! Protocols given as a `Ref`/`Fn::*` value are not judged.

use stacklint_core::intrinsic::intrinsic_name;
use stacklint_core::{DocPath, Finding, Node, Rule, Template};
use tracing::debug;

/// Rule id for the ELB listener rule.
pub const CODE: &str = "E2503";

const V2_LISTENER: &str = "AWS::ElasticLoadBalancingV2::Listener";
const CLASSIC_LOAD_BALANCER: &str = "AWS::ElasticLoadBalancing::LoadBalancer";

const PROTOCOL: &str = "Protocol";

/// Protocol and certificate constraints for one listener shape.
#[derive(Debug, Clone, Copy)]
struct ListenerShape {
    allowed: &'static [&'static str],
    secure: &'static [&'static str],
    certificate_field: &'static str,
}

/// Standalone `AWS::ElasticLoadBalancingV2::Listener`.
const V2_SHAPE: ListenerShape = ListenerShape {
    allowed: &["HTTP", "HTTPS", "TCP"],
    secure: &["HTTPS"],
    certificate_field: "Certificates",
};

/// Entry of a classic load balancer's `Listeners` list.
const CLASSIC_SHAPE: ListenerShape = ListenerShape {
    allowed: &["HTTP", "HTTPS", "TCP", "SSL"],
    secure: &["HTTPS", "SSL"],
    certificate_field: "SSLCertificateId",
};

/// Checks listener protocols and certificate presence on load balancers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElbListenerProtocol;

impl ElbListenerProtocol {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ElbListenerProtocol {
    fn id(&self) -> &'static str {
        CODE
    }

    fn short_description(&self) -> &'static str {
        "Resource ELB Properties"
    }

    fn description(&self) -> &'static str {
        "See if Elb Resource Properties are set correctly HTTPS has certificate HTTP has no certificate"
    }

    fn source_url(&self) -> Option<&'static str> {
        Some("https://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide/aws-properties-ec2-elb-listener.html")
    }

    fn tags(&self) -> &'static [&'static str] {
        &["properties", "elb"]
    }

    fn check(&self, template: &Template) -> Vec<Finding> {
        let mut findings = Vec::new();

        for occurrence in template.locate(&[V2_LISTENER], &[]) {
            check_listener(
                &V2_SHAPE,
                occurrence.value,
                &occurrence.path,
                &occurrence.path,
                &mut findings,
            );
        }

        for occurrence in template.locate(&[CLASSIC_LOAD_BALANCER], &["Listeners"]) {
            let Some(listeners) = occurrence.value.as_sequence() else {
                debug!("{}: Listeners is not a list, skipping", occurrence.path);
                continue;
            };
            for (index, listener) in listeners.iter().enumerate() {
                check_listener(
                    &CLASSIC_SHAPE,
                    listener,
                    &occurrence.path.index(index),
                    &occurrence.path,
                    &mut findings,
                );
            }
        }

        findings
    }
}

/// Checks one listener mapping.
///
/// `listener_path` is where the listener lives; findings are anchored at its
/// `Protocol` key. `resource_path` is the located property path embedded in
/// the message.
fn check_listener(
    shape: &ListenerShape,
    listener: &Node,
    listener_path: &DocPath,
    resource_path: &DocPath,
    findings: &mut Vec<Finding>,
) {
    let Some(protocol) = listener.get(PROTOCOL) else {
        return;
    };
    if protocol.is_empty() {
        return;
    }
    if let Some(function) = intrinsic_name(protocol) {
        debug!("{listener_path}: Protocol is {function}, not judged");
        return;
    }

    let name = protocol.as_str();
    if !name.is_some_and(|p| shape.allowed.contains(&p)) {
        findings.push(Finding::new(
            listener_path.key(PROTOCOL),
            format!("Protocol is invalid for {resource_path}"),
        ));
        return;
    }

    // A deferred value never equals a protocol literal, so deferred protocols
    // also skip the certificate check.
    if name.is_some_and(|p| shape.secure.contains(&p)) {
        let has_certificate = listener
            .get(shape.certificate_field)
            .is_some_and(|c| !c.is_empty());
        if !has_certificate {
            findings.push(Finding::new(
                listener_path.key(PROTOCOL),
                format!("Certificates should be specified when using HTTPS for {resource_path}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacklint_core::loader::{from_json_str, from_yaml_str};

    fn check_yaml(yaml: &str) -> Vec<Finding> {
        let template = Template::new(from_yaml_str(yaml).expect("Failed to parse"));
        ElbListenerProtocol::new().check(&template)
    }

    fn v2_listener(properties: &str) -> String {
        format!(
            "Resources:\n  Listener:\n    Type: AWS::ElasticLoadBalancingV2::Listener\n    Properties:\n{properties}"
        )
    }

    #[test]
    fn test_metadata() {
        let rule = ElbListenerProtocol::new();
        assert_eq!(rule.id(), "E2503");
        assert_eq!(rule.severity(), stacklint_core::Severity::Error);
        assert_eq!(rule.tags(), &["properties", "elb"]);
        assert!(rule.source_url().is_some());
    }

    #[test]
    fn test_no_matching_resources() {
        let findings = check_yaml(
            r"
Resources:
  Bucket:
    Type: AWS::S3::Bucket
    Properties:
      Protocol: FTP
",
        );
        assert!(findings.is_empty());
        assert!(check_yaml("{}").is_empty());
    }

    #[test]
    fn test_v2_missing_protocol() {
        assert!(check_yaml(&v2_listener("      Port: 80\n")).is_empty());
    }

    #[test]
    fn test_v2_invalid_protocol() {
        let findings = check_yaml(&v2_listener("      Protocol: FTP\n"));
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].path().to_string(),
            "Resources/Listener/Properties/Protocol"
        );
        assert_eq!(
            findings[0].message(),
            "Protocol is invalid for Resources/Listener/Properties"
        );
    }

    #[test]
    fn test_v2_https_without_certificates() {
        let findings = check_yaml(&v2_listener("      Protocol: HTTPS\n"));
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].message(),
            "Certificates should be specified when using HTTPS for Resources/Listener/Properties"
        );

        let findings = check_yaml(&v2_listener("      Protocol: HTTPS\n      Certificates: []\n"));
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_v2_https_with_certificates() {
        let findings = check_yaml(&v2_listener(
            "      Protocol: HTTPS\n      Certificates:\n        - CertificateArn: arn:aws:acm:cert\n",
        ));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_v2_plain_protocols() {
        assert!(check_yaml(&v2_listener("      Protocol: HTTP\n")).is_empty());
        assert!(check_yaml(&v2_listener("      Protocol: TCP\n")).is_empty());
    }

    #[test]
    fn test_v2_ssl_is_not_allowed() {
        let findings = check_yaml(&v2_listener("      Protocol: SSL\n"));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message().starts_with("Protocol is invalid"));
    }

    #[test]
    fn test_v2_deferred_protocol() {
        assert!(check_yaml(&v2_listener("      Protocol: !Ref ProtocolParam\n")).is_empty());
        assert!(check_yaml(&v2_listener(
            "      Protocol:\n        Fn::If: [IsSecure, HTTPS, HTTP]\n"
        ))
        .is_empty());
    }

    #[test]
    fn test_v2_non_string_protocol_is_invalid() {
        let findings = check_yaml(&v2_listener("      Protocol: 443\n"));
        assert_eq!(findings.len(), 1);

        let findings = check_yaml(&v2_listener(
            "      Protocol:\n        Ref: A\n        Extra: B\n",
        ));
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_v2_empty_protocol_is_absent() {
        assert!(check_yaml(&v2_listener("      Protocol: ''\n")).is_empty());
        assert!(check_yaml(&v2_listener("      Protocol: ~\n")).is_empty());
        assert!(check_yaml(&v2_listener("      Protocol: false\n")).is_empty());
        assert!(check_yaml(&v2_listener("      Protocol: 0\n")).is_empty());
    }

    #[test]
    fn test_falsy_certificate_is_missing() {
        let findings = check_yaml(&v2_listener(
            "      Protocol: HTTPS\n      Certificates: false\n",
        ));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message().starts_with("Certificates should be specified"));

        let findings = check_yaml(
            r"
Resources:
  Lb:
    Type: AWS::ElasticLoadBalancing::LoadBalancer
    Properties:
      Listeners:
        - Protocol: SSL
          SSLCertificateId: 0
",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].path().to_string(),
            "Resources/Lb/Properties/Listeners/0/Protocol"
        );
    }

    #[test]
    fn test_classic_listeners() {
        let template = Template::new(
            from_json_str(
                r#"{
  "Resources": {
    "Lb": {
      "Type": "AWS::ElasticLoadBalancing::LoadBalancer",
      "Properties": {
        "Listeners": [
          {"Protocol": "SSL"},
          {"Protocol": "HTTP", "SSLCertificateId": "x"}
        ]
      }
    }
  }
}"#,
            )
            .unwrap(),
        );

        let findings = ElbListenerProtocol::new().check(&template);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].path().to_string(),
            "Resources/Lb/Properties/Listeners/0/Protocol"
        );
        assert_eq!(
            findings[0].message(),
            "Certificates should be specified when using HTTPS for Resources/Lb/Properties/Listeners"
        );
        assert_eq!(
            template
                .node_at(findings[0].path())
                .and_then(Node::as_str),
            Some("SSL")
        );
    }

    #[test]
    fn test_classic_invalid_and_secure() {
        let findings = check_yaml(
            r"
Resources:
  Lb:
    Type: AWS::ElasticLoadBalancing::LoadBalancer
    Properties:
      Listeners:
        - Protocol: HTTPS
          SSLCertificateId: arn:aws:iam::cert
        - Protocol: UDP
        - Protocol: HTTPS
          SSLCertificateId: ''
        - Protocol: !Ref ListenerProtocol
        - NotAMappingButOk
",
        );

        let paths: Vec<String> = findings.iter().map(|f| f.path().to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "Resources/Lb/Properties/Listeners/1/Protocol",
                "Resources/Lb/Properties/Listeners/2/Protocol",
            ]
        );
        assert!(findings[0].message().starts_with("Protocol is invalid"));
        assert!(findings[1].message().starts_with("Certificates should be specified"));
    }

    #[test]
    fn test_classic_listeners_not_a_list() {
        let findings = check_yaml(
            r"
Resources:
  Lb:
    Type: AWS::ElasticLoadBalancing::LoadBalancer
    Properties:
      Listeners: !Ref ListenerConfig
",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_malformed_resource_does_not_stop_siblings() {
        let findings = check_yaml(
            r"
Resources:
  Broken:
    Type: AWS::ElasticLoadBalancingV2::Listener
    Properties: just-a-string
  BrokenLb:
    Type: AWS::ElasticLoadBalancing::LoadBalancer
    Properties:
      Listeners: 42
  Good:
    Type: AWS::ElasticLoadBalancingV2::Listener
    Properties:
      Protocol: FTP
",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].path().to_string(),
            "Resources/Good/Properties/Protocol"
        );
    }

    #[test]
    fn test_idempotent() {
        let template = Template::new(
            from_yaml_str(&v2_listener("      Protocol: HTTPS\n")).expect("Failed to parse"),
        );
        let rule = ElbListenerProtocol::new();
        assert_eq!(rule.check(&template), rule.check(&template));
    }

    #[test]
    fn test_concurrent_checks_share_template() {
        let template = Template::new(
            from_yaml_str(&v2_listener("      Protocol: FTP\n")).expect("Failed to parse"),
        );
        let rule = ElbListenerProtocol::new();

        let results: Vec<Vec<Finding>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| rule.check(&template))).collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("thread panicked"))
                .collect()
        });

        assert!(results.iter().all(|r| r == &results[0]));
        assert_eq!(results[0].len(), 1);
    }
}
