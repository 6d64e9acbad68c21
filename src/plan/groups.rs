//! Apply order for every component group.
//!
//! Within a group: namespace, image pull secret, service accounts, roles,
//! bindings, policy object plus bind, CRDs, workloads, then companion
//! services and jobs.
use super::{GroupId, ManifestOperation, OperationKind, PolicyBinding, Target, Tool, Variant};
use crate::catalog::ManifestKey as K;
use crate::exec::Checkpoint;

const fn apply(key: K) -> ManifestOperation {
    ManifestOperation {
        kind: OperationKind::Apply,
        target: Target::Manifest {
            key,
            tool: Tool::Kubectl,
        },
        tolerate_missing: false,
        variant: Variant::Common,
        retained_on_teardown: false,
    }
}

/// Deleting tolerates an already absent resource.
const fn tolerant(key: K) -> ManifestOperation {
    ManifestOperation {
        tolerate_missing: true,
        ..apply(key)
    }
}

const fn only(variant: Variant, key: K) -> ManifestOperation {
    ManifestOperation {
        variant,
        ..apply(key)
    }
}

const fn retained(operation: ManifestOperation) -> ManifestOperation {
    ManifestOperation {
        retained_on_teardown: true,
        ..operation
    }
}

const fn checkpoint(checkpoint: Checkpoint) -> ManifestOperation {
    ManifestOperation {
        kind: OperationKind::RunShellStep,
        target: Target::Checkpoint(checkpoint),
        tolerate_missing: false,
        variant: Variant::Common,
        retained_on_teardown: false,
    }
}

const fn user_secret() -> ManifestOperation {
    ManifestOperation {
        kind: OperationKind::RunShellStep,
        target: Target::UserSecret,
        tolerate_missing: false,
        variant: Variant::Common,
        retained_on_teardown: true,
    }
}

const fn bind(
    cluster_role: &'static str,
    namespace: &'static str,
    service_account: &'static str,
) -> ManifestOperation {
    ManifestOperation {
        kind: OperationKind::Apply,
        target: Target::PolicyBinding(PolicyBinding {
            cluster_role,
            namespace,
            service_account,
        }),
        tolerate_missing: false,
        variant: Variant::PolicyVariant,
        retained_on_teardown: false,
    }
}

/// Security object applied with the policy client.
const fn policy_object(key: K) -> ManifestOperation {
    ManifestOperation {
        target: Target::Manifest {
            key,
            tool: Tool::Policy,
        },
        ..only(Variant::PolicyVariant, key)
    }
}

const fn policy_pair(
    key: K,
    cluster_role: &'static str,
    namespace: &'static str,
    service_account: &'static str,
) -> [ManifestOperation; 2] {
    [
        policy_object(key),
        bind(cluster_role, namespace, service_account),
    ]
}

fn chain(parts: &[&[ManifestOperation]]) -> Vec<ManifestOperation> {
    parts.concat()
}

pub(super) fn apply_operations(group: GroupId) -> Vec<ManifestOperation> {
    match group {
        GroupId::Preflight => vec![checkpoint(Checkpoint::ClusterReachable)],
        GroupId::Readiness => vec![checkpoint(Checkpoint::ReadyToProceed)],
        GroupId::BootstrapSupport => chain(&[
            &[
                apply(K::BootstrapNamespace),
                apply(K::BootstrapImagePullSecret),
                apply(K::BootstrapSa),
                apply(K::BootstrapCr),
                apply(K::BootstrapRole),
                tolerant(K::BootstrapCrb),
                apply(K::BootstrapRb),
            ],
            &policy_pair(
                K::BootstrapScc,
                "maprbootstrap-cr",
                "mapr-bootstrap",
                "maprbootstrap-sa",
            ),
            &[apply(K::BootstrapNodeValidator)],
        ]),
        GroupId::ConfigurationCspaces => vec![
            apply(K::ConfigurationNamespace),
            apply(K::ConfigurationHivemetaCm),
            apply(K::ConfigurationLdapclientCm),
            apply(K::ConfigurationSssdSecret),
            apply(K::ConfigurationSparkhistoryCm),
            apply(K::ConfigurationCspaceterminalCm),
            apply(K::ConfigurationRoleCspace),
            apply(K::ConfigurationRoleCspaceTerminal),
            apply(K::ConfigurationRoleCspaceUser),
            apply(K::ConfigurationPspCspace),
        ],
        GroupId::ConfigurationClusters => vec![
            apply(K::ConfigurationClustersNamespace),
            apply(K::ConfigurationAdmincliCm),
            apply(K::ConfigurationCldbCm),
            apply(K::ConfigurationCollectdCm),
            apply(K::ConfigurationDagCm),
            apply(K::ConfigurationElasticsearchCm),
            apply(K::ConfigurationFluentbitCm),
            apply(K::ConfigurationGrafanaCm),
            apply(K::ConfigurationKafkarestCm),
            apply(K::ConfigurationKibanaCm),
            apply(K::ConfigurationMaprgatewayCm),
            apply(K::ConfigurationMastgatewayCm),
            apply(K::ConfigurationMfsCm),
            apply(K::ConfigurationNfsCm),
            apply(K::ConfigurationObjectstoreCm),
            apply(K::ConfigurationOpentsdbCm),
            apply(K::ConfigurationWebserverCm),
            apply(K::ConfigurationZookeeperCm),
            apply(K::ConfigurationClustersHivemetaCm),
            apply(K::ConfigurationClustersLdapclientCm),
            apply(K::ConfigurationClustersSssdSecret),
            apply(K::ConfigurationRoleCluster),
            apply(K::ConfigurationRoleClusterUser),
            apply(K::ConfigurationPspCluster),
        ],
        GroupId::Csi => vec![
            apply(K::CsiNamespace),
            apply(K::CsiImagePullSecret),
            apply(K::CsiNodepluginSa),
            apply(K::CsiProvisionerSa),
            apply(K::CsiAttacherCr),
            apply(K::CsiNodepluginCr),
            apply(K::CsiProvisionerCr),
            tolerant(K::CsiAttacherCrb),
            tolerant(K::CsiNodepluginCrb),
            tolerant(K::CsiProvisionerCrb),
            policy_object(K::CsiScc),
            bind("csi-nodeplugin-cr", "mapr-csi", "csi-nodeplugin-sa"),
            bind("csi-attacher-cr", "mapr-csi", "csi-provisioner-sa"),
            bind("csi-provisioner-cr", "mapr-csi", "csi-provisioner-sa"),
            only(Variant::Default, K::CsiNodeplugin),
            only(Variant::PolicyVariant, K::CsiOpenshiftNodeplugin),
            only(Variant::Default, K::CsiProvisioner),
            only(Variant::PolicyVariant, K::CsiOpenshiftProvisioner),
        ],
        GroupId::External => vec![apply(K::ExternalNamespace)],
        GroupId::SystemCspace => chain(&[
            &[
                apply(K::SystemNamespace),
                apply(K::SystemImagePullSecret),
                apply(K::SystemCspaceSa),
                apply(K::SystemCspaceCr),
                apply(K::SystemPvCr),
                apply(K::SystemCspaceCrb),
            ],
            &policy_pair(
                K::SystemCspaceScc,
                "cspaceoperator-cr",
                "mapr-system",
                "cspaceoperator-sa",
            ),
            &[
                apply(K::SystemCspaceCrd),
                only(Variant::Default, K::SystemCspaceOperator),
                only(Variant::PolicyVariant, K::SystemCspaceOperatorOpenshift),
                apply(K::SystemPriorityClassAdmin),
                apply(K::SystemPriorityClassClusterServices),
                apply(K::SystemPriorityClassCompute),
                apply(K::SystemPriorityClassCritical),
                apply(K::SystemPriorityClassGateways),
                apply(K::SystemPriorityClassMetrics),
                apply(K::SystemPriorityClassMfs),
                apply(K::SystemPriorityClassCspaceServices),
                apply(K::SystemStorageClassHdd),
                apply(K::SystemStorageClassNvme),
                apply(K::SystemStorageClassSsd),
            ],
        ]),
        GroupId::SystemCluster => chain(&[
            &[
                retained(apply(K::SystemClusterSa)),
                apply(K::SystemClusterCr),
                apply(K::SystemClusterCrb),
            ],
            &policy_pair(
                K::SystemClusterScc,
                "clusteroperator-cr",
                "mapr-system",
                "clusteroperator-sa",
            ),
            &[
                user_secret(),
                apply(K::SystemClusterCrd),
                retained(apply(K::SystemClusterOperator)),
            ],
        ]),
        GroupId::Spark => chain(&[
            &[
                apply(K::SparkNamespace),
                apply(K::SparkImagePullSecret),
                apply(K::SparkSa),
                apply(K::SparkCr),
                apply(K::SparkCrb),
            ],
            &policy_pair(
                K::SparkScc,
                "sparkoperator-cr",
                "spark-operator",
                "sparkoperator-sa",
            ),
            &[
                apply(K::SparkCrdSparkApplication),
                apply(K::SparkCrdScheduledApplication),
                apply(K::SparkOperator),
                apply(K::SparkSvc),
                apply(K::SparkJob),
            ],
        ]),
        GroupId::Drill => chain(&[
            &[
                apply(K::DrillNamespace),
                apply(K::DrillImagePullSecret),
                apply(K::DrillSa),
                apply(K::DrillCr),
                apply(K::DrillRole),
                tolerant(K::DrillCrb),
                apply(K::DrillRb),
            ],
            &policy_pair(
                K::DrillScc,
                "drilloperator-cr",
                "drill-operator",
                "drilloperator-sa",
            ),
            &[apply(K::DrillCrd), apply(K::DrillOperator)],
        ]),
        GroupId::Kubeflow => vec![
            apply(K::KubeflowNamespace),
            apply(K::KubeflowImagePullSecret),
            apply(K::KubeflowSa),
            apply(K::KubeflowCr),
            tolerant(K::KubeflowCrb),
            apply(K::KubeflowCrdAlertmanager),
            apply(K::KubeflowCrdArgo),
            apply(K::KubeflowCrdKubeflowOperator),
            apply(K::KubeflowCrdNotebook),
            apply(K::KubeflowCrdPrometheus),
            apply(K::KubeflowCrdPrometheusRule),
            apply(K::KubeflowCrdPytorch),
            apply(K::KubeflowCrdSeldonDeployment),
            apply(K::KubeflowCrdServiceMonitor),
            apply(K::KubeflowCrdTfjob),
            apply(K::KubeflowCrdTfserving),
            apply(K::KubeflowCrdZeppelin),
            apply(K::KubeflowOperator),
        ],
        GroupId::Ingress => chain(&[
            &[
                apply(K::IngressNamespace),
                apply(K::IngressSa),
                apply(K::IngressCr),
                apply(K::IngressCrb),
            ],
            &policy_pair(K::IngressScc, "ingress-cr", "mapr-ingress", "ingress-sa"),
            &[
                apply(K::IngressAmbassador1),
                apply(K::IngressAmbassador2),
                only(Variant::Cloud, K::IngressSvcCloud),
                only(Variant::BareMetal, K::IngressSecretTls),
                only(Variant::BareMetal, K::IngressSvcBaremetalHttp),
                only(Variant::BareMetal, K::IngressSvcBaremetalHttps),
            ],
        ]),
        GroupId::Ui => chain(&[
            &[
                apply(K::UiNamespace),
                apply(K::UiImagePullSecret),
                apply(K::UiSa),
                apply(K::UiCr),
                apply(K::UiRole),
                apply(K::UiCrb),
                apply(K::UiRb),
            ],
            &policy_pair(K::UiScc, "maprui-cr", "mapr-ui", "maprui-sa"),
            &[apply(K::UiPas), apply(K::UiPasSvc)],
        ]),
    }
}
