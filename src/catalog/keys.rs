//! Static table of every manifest the bootstrapper knows about.
use serde::{Serialize, Serializer};

/// Category directories under the manifests root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Bootstrap,
    ConfigurationCspaces,
    ConfigurationClusters,
    Csi,
    Drill,
    External,
    Ingress,
    Kubeflow,
    Spark,
    SystemCluster,
    SystemCspace,
    Ui,
}

impl Category {
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Bootstrap => "bootstrap",
            Category::ConfigurationCspaces => "configuration-cspaces",
            Category::ConfigurationClusters => "configuration-clusters",
            Category::Csi => "csi",
            Category::Drill => "drill",
            Category::External => "external",
            Category::Ingress => "ingress",
            Category::Kubeflow => "kubeflow",
            Category::Spark => "spark",
            Category::SystemCluster => "system-cluster",
            Category::SystemCspace => "system-cspace",
            Category::Ui => "ui",
        }
    }
}

macro_rules! manifest_keys {
    ($($variant:ident => ($name:literal, $category:ident, $file:literal),)+) => {
        /// Closed set of logical manifest keys.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ManifestKey {
            $($variant,)+
        }

        impl ManifestKey {
            pub const ALL: &'static [ManifestKey] = &[$(ManifestKey::$variant,)+];

            /// Logical key used in logs and plan output.
            pub fn name(self) -> &'static str {
                match self {
                    $(ManifestKey::$variant => $name,)+
                }
            }

            pub fn category(self) -> Category {
                match self {
                    $(ManifestKey::$variant => Category::$category,)+
                }
            }

            pub fn file_name(self) -> &'static str {
                match self {
                    $(ManifestKey::$variant => $file,)+
                }
            }
        }
    };
}

manifest_keys! {
    BootstrapNamespace => ("bootstrap-namespace", Bootstrap, "bootstrap-namespace.yaml"),
    BootstrapImagePullSecret => ("bootstrap-imagepullsecret", Bootstrap, "bootstrap-imagepullsecret.yaml"),
    BootstrapSa => ("bootstrap-sa", Bootstrap, "bootstrap-sa.yaml"),
    BootstrapCr => ("bootstrap-cr", Bootstrap, "bootstrap-cr.yaml"),
    BootstrapRole => ("bootstrap-role", Bootstrap, "bootstrap-role.yaml"),
    BootstrapCrb => ("bootstrap-crb", Bootstrap, "bootstrap-crb.yaml"),
    BootstrapRb => ("bootstrap-rb", Bootstrap, "bootstrap-rb.yaml"),
    BootstrapScc => ("bootstrap-scc", Bootstrap, "bootstrap-scc.yaml"),
    BootstrapNodeValidator => ("bootstrap-nodevalidator", Bootstrap, "bootstrap-deploy-validator.yaml"),

    ConfigurationNamespace => ("configuration-namespace", ConfigurationCspaces, "configuration-namespace.yaml"),
    ConfigurationHivemetaCm => ("configuration-hivemeta-cm", ConfigurationCspaces, "configuration-hivemeta-cm.yaml"),
    ConfigurationLdapclientCm => ("configuration-ldapclient-cm", ConfigurationCspaces, "configuration-ldapclient-cm.yaml"),
    ConfigurationSssdSecret => ("configuration-sssdsecret", ConfigurationCspaces, "configuration-sssdsecret.yaml"),
    ConfigurationSparkhistoryCm => ("configuration-sparkhistory-cm", ConfigurationCspaces, "configuration-sparkhistory-cm.yaml"),
    ConfigurationCspaceterminalCm => ("configuration-cspaceterminal-cm", ConfigurationCspaces, "configuration-cspaceterminal-cm.yaml"),
    ConfigurationRoleCspace => ("configuration-role-cspace", ConfigurationCspaces, "configuration-role-cspace.yaml"),
    ConfigurationRoleCspaceTerminal => ("configuration-role-cspace-terminal", ConfigurationCspaces, "configuration-role-cspace-terminal.yaml"),
    ConfigurationRoleCspaceUser => ("configuration-role-cspace-user", ConfigurationCspaces, "configuration-role-cspace-user.yaml"),
    ConfigurationPspCspace => ("configuration-psp-cspace", ConfigurationCspaces, "configuration-psp-cspace.yaml"),

    ConfigurationClustersNamespace => ("configuration-clusters-namespace", ConfigurationClusters, "configuration-namespace.yaml"),
    ConfigurationAdmincliCm => ("configuration-admincli-cm", ConfigurationClusters, "configuration-admincli-cm.yaml"),
    ConfigurationCldbCm => ("configuration-cldb-cm", ConfigurationClusters, "configuration-cldb-cm.yaml"),
    ConfigurationCollectdCm => ("configuration-collectd-cm", ConfigurationClusters, "configuration-collectd-cm.yaml"),
    ConfigurationDagCm => ("configuration-dag-cm", ConfigurationClusters, "configuration-dag-cm.yaml"),
    ConfigurationElasticsearchCm => ("configuration-elasticsearch-cm", ConfigurationClusters, "configuration-elasticsearch-cm.yaml"),
    ConfigurationFluentbitCm => ("configuration-fluentbit-cm", ConfigurationClusters, "configuration-fluentbit-cm.yaml"),
    ConfigurationGrafanaCm => ("configuration-grafana-cm", ConfigurationClusters, "configuration-grafana-cm.yaml"),
    ConfigurationKafkarestCm => ("configuration-kafkarest-cm", ConfigurationClusters, "configuration-kafkarest-cm.yaml"),
    ConfigurationKibanaCm => ("configuration-kibana-cm", ConfigurationClusters, "configuration-kibana-cm.yaml"),
    ConfigurationMaprgatewayCm => ("configuration-maprgateway-cm", ConfigurationClusters, "configuration-maprgateway-cm.yaml"),
    ConfigurationMastgatewayCm => ("configuration-mastgateway-cm", ConfigurationClusters, "configuration-mastgateway-cm.yaml"),
    ConfigurationMfsCm => ("configuration-mfs-cm", ConfigurationClusters, "configuration-mfs-cm.yaml"),
    ConfigurationNfsCm => ("configuration-nfs-cm", ConfigurationClusters, "configuration-nfs-cm.yaml"),
    ConfigurationObjectstoreCm => ("configuration-objectstore-cm", ConfigurationClusters, "configuration-objectstore-cm.yaml"),
    ConfigurationOpentsdbCm => ("configuration-opentsdb-cm", ConfigurationClusters, "configuration-opentsdb-cm.yaml"),
    ConfigurationWebserverCm => ("configuration-webserver-cm", ConfigurationClusters, "configuration-webserver-cm.yaml"),
    ConfigurationZookeeperCm => ("configuration-zookeeper-cm", ConfigurationClusters, "configuration-zookeeper-cm.yaml"),
    ConfigurationClustersHivemetaCm => ("configuration-clusters-hivemeta-cm", ConfigurationClusters, "configuration-hivemeta-cm.yaml"),
    ConfigurationClustersLdapclientCm => ("configuration-clusters-ldapclient-cm", ConfigurationClusters, "configuration-ldapclient-cm.yaml"),
    ConfigurationClustersSssdSecret => ("configuration-clusters-sssdsecret", ConfigurationClusters, "configuration-sssdsecret.yaml"),
    ConfigurationRoleCluster => ("configuration-role-cluster", ConfigurationClusters, "configuration-role-cluster.yaml"),
    ConfigurationRoleClusterUser => ("configuration-role-cluster-user", ConfigurationClusters, "configuration-role-cluster-user.yaml"),
    ConfigurationPspCluster => ("configuration-psp-cluster", ConfigurationClusters, "configuration-psp-cluster.yaml"),

    CsiNamespace => ("csi-namespace", Csi, "csi-namespace.yaml"),
    CsiImagePullSecret => ("csi-imagepullsecret", Csi, "csi-imagepullsecret.yaml"),
    CsiNodepluginSa => ("csi-nodeplugin-sa", Csi, "csi-nodeplugin-sa.yaml"),
    CsiProvisionerSa => ("csi-provisioner-sa", Csi, "csi-provisioner-sa.yaml"),
    CsiAttacherCr => ("csi-attacher-cr", Csi, "csi-attacher-cr.yaml"),
    CsiNodepluginCr => ("csi-nodeplugin-cr", Csi, "csi-nodeplugin-cr.yaml"),
    CsiProvisionerCr => ("csi-provisioner-cr", Csi, "csi-provisioner-cr.yaml"),
    CsiAttacherCrb => ("csi-attacher-crb", Csi, "csi-attacher-crb.yaml"),
    CsiNodepluginCrb => ("csi-nodeplugin-crb", Csi, "csi-nodeplugin-crb.yaml"),
    CsiProvisionerCrb => ("csi-provisioner-crb", Csi, "csi-provisioner-crb.yaml"),
    CsiScc => ("csi-scc", Csi, "csi-scc.yaml"),
    CsiNodeplugin => ("csi-nodeplugin", Csi, "csi-deploy-nodeplugin.yaml"),
    CsiOpenshiftNodeplugin => ("csi-openshift-nodeplugin", Csi, "csi-deploy-openshift-nodeplugin.yaml"),
    CsiProvisioner => ("csi-provisioner", Csi, "csi-deploy-provisioner.yaml"),
    CsiOpenshiftProvisioner => ("csi-openshift-provisioner", Csi, "csi-deploy-openshift-provisioner.yaml"),

    DrillNamespace => ("drill-namespace", Drill, "drill-namespace.yaml"),
    DrillImagePullSecret => ("drill-imagepullsecret", Drill, "drill-imagepullsecret.yaml"),
    DrillSa => ("drill-sa", Drill, "drill-sa.yaml"),
    DrillCr => ("drill-cr", Drill, "drill-cr.yaml"),
    DrillRole => ("drill-role", Drill, "drill-role.yaml"),
    DrillCrb => ("drill-crb", Drill, "drill-crb.yaml"),
    DrillRb => ("drill-rb", Drill, "drill-rb.yaml"),
    DrillScc => ("drill-scc", Drill, "drill-scc.yaml"),
    DrillCrd => ("drill-crd", Drill, "drill-crd.yaml"),
    DrillOperator => ("drill-drilloperator", Drill, "drill-deploy-drilloperator.yaml"),

    ExternalNamespace => ("external-namespace", External, "external-namespace.yaml"),

    IngressNamespace => ("ingress-namespace", Ingress, "ingress-namespace.yaml"),
    IngressSa => ("ingress-sa", Ingress, "ingress-sa.yaml"),
    IngressCr => ("ingress-cr", Ingress, "ingress-cr.yaml"),
    IngressCrb => ("ingress-crb", Ingress, "ingress-crb.yaml"),
    IngressScc => ("ingress-scc", Ingress, "ingress-scc.yaml"),
    IngressAmbassador1 => ("ingress-ambassador1", Ingress, "ingress-deploy-ambassador1.yaml"),
    IngressAmbassador2 => ("ingress-ambassador2", Ingress, "ingress-deploy-ambassador2.yaml"),
    IngressSvcCloud => ("ingress-svc-cloud", Ingress, "ingress-svc-cloud.yaml"),
    IngressSecretTls => ("ingress-secret-tls", Ingress, "ingress-secret-tls.yaml"),
    IngressSvcBaremetalHttp => ("ingress-svc-baremetal-http", Ingress, "ingress-svc-baremetalhttp.yaml"),
    IngressSvcBaremetalHttps => ("ingress-svc-baremetal-https", Ingress, "ingress-svc-baremetalhttps.yaml"),

    KubeflowNamespace => ("kubeflow-namespace", Kubeflow, "kubeflow-namespace.yaml"),
    KubeflowImagePullSecret => ("kubeflow-imagepullsecret", Kubeflow, "kubeflow-imagepullsecret.yaml"),
    KubeflowSa => ("kubeflow-sa", Kubeflow, "kubeflow-sa.yaml"),
    KubeflowCr => ("kubeflow-cr", Kubeflow, "kubeflow-cr.yaml"),
    KubeflowCrb => ("kubeflow-crb", Kubeflow, "kubeflow-crb.yaml"),
    KubeflowCrdAlertmanager => ("kubeflow-crd-alertmanager", Kubeflow, "kubeflow-crd-alertmanager.yaml"),
    KubeflowCrdArgo => ("kubeflow-crd-argo", Kubeflow, "kubeflow-crd-argo.yaml"),
    KubeflowCrdKubeflowOperator => ("kubeflow-crd-kubeflowoperator", Kubeflow, "kubeflow-crd-kubeflowoperator.yaml"),
    KubeflowCrdNotebook => ("kubeflow-crd-notebook", Kubeflow, "kubeflow-crd-notebook.yaml"),
    KubeflowCrdPrometheus => ("kubeflow-crd-prometheus", Kubeflow, "kubeflow-crd-prometheus.yaml"),
    KubeflowCrdPrometheusRule => ("kubeflow-crd-prometheusrule", Kubeflow, "kubeflow-crd-prometheusrule.yaml"),
    KubeflowCrdPytorch => ("kubeflow-crd-pytorch", Kubeflow, "kubeflow-crd-pytorch.yaml"),
    KubeflowCrdSeldonDeployment => ("kubeflow-crd-seldondeployment", Kubeflow, "kubeflow-crd-seldondeployment.yaml"),
    KubeflowCrdServiceMonitor => ("kubeflow-crd-servicemonitor", Kubeflow, "kubeflow-crd-servicemonitor.yaml"),
    KubeflowCrdTfjob => ("kubeflow-crd-tfjob", Kubeflow, "kubeflow-crd-tfjob.yaml"),
    KubeflowCrdTfserving => ("kubeflow-crd-tfserving", Kubeflow, "kubeflow-crd-tfserving.yaml"),
    KubeflowCrdZeppelin => ("kubeflow-crd-zeppelin", Kubeflow, "kubeflow-crd-zeppelin.yaml"),
    KubeflowOperator => ("kubeflow-kubeflowoperator", Kubeflow, "kubeflow-deploy-kubeflowoperator.yaml"),

    SparkNamespace => ("spark-namespace", Spark, "spark-namespace.yaml"),
    SparkImagePullSecret => ("spark-imagepullsecret", Spark, "spark-imagepullsecret.yaml"),
    SparkSa => ("spark-sa", Spark, "spark-sa.yaml"),
    SparkCr => ("spark-cr", Spark, "spark-cr.yaml"),
    SparkCrb => ("spark-crb", Spark, "spark-crb.yaml"),
    SparkScc => ("spark-scc", Spark, "spark-scc.yaml"),
    SparkCrdSparkApplication => ("spark-crd-sparkapplication", Spark, "spark-crd-sparkapplication.yaml"),
    SparkCrdScheduledApplication => ("spark-crd-sparkscheduledapplication", Spark, "spark-crd-sparkscheduledapplication.yaml"),
    SparkOperator => ("spark-sparkoperator", Spark, "spark-deploy-sparkoperator.yaml"),
    SparkSvc => ("spark-svc", Spark, "spark-svc-sparkoperator.yaml"),
    SparkJob => ("spark-job", Spark, "spark-job-sparkoperator.yaml"),

    SystemClusterSa => ("system-sa-cluster", SystemCluster, "system-sa-cluster.yaml"),
    SystemClusterCr => ("system-cr-cluster", SystemCluster, "system-cr-cluster.yaml"),
    SystemClusterCrb => ("system-crb-cluster", SystemCluster, "system-crb-cluster.yaml"),
    SystemClusterScc => ("system-scc-cluster", SystemCluster, "system-scc-cluster.yaml"),
    SystemClusterCrd => ("system-crd-cluster", SystemCluster, "system-crd-clusteroperator.yaml"),
    SystemClusterOperator => ("system-clusteroperator", SystemCluster, "system-deploy-clusteroperator.yaml"),

    SystemNamespace => ("system-namespace", SystemCspace, "system-namespace.yaml"),
    SystemImagePullSecret => ("system-imagepullsecret", SystemCspace, "system-imagepullsecret.yaml"),
    SystemCspaceSa => ("system-sa-cspace", SystemCspace, "system-sa-cspace.yaml"),
    SystemCspaceCr => ("system-cr-cspace", SystemCspace, "system-cr-cspace.yaml"),
    SystemPvCr => ("system-cr-pv", SystemCspace, "system-cr-pv.yaml"),
    SystemCspaceCrb => ("system-crb-cspace", SystemCspace, "system-crb-cspace.yaml"),
    SystemCspaceScc => ("system-scc-cspace", SystemCspace, "system-scc-cspace.yaml"),
    SystemCspaceCrd => ("system-crd-cspace", SystemCspace, "system-crd-cspaceoperator.yaml"),
    SystemCspaceOperator => ("system-cspaceoperator", SystemCspace, "system-deploy-cspaceoperator.yaml"),
    SystemCspaceOperatorOpenshift => ("system-cspaceoperator-openshift", SystemCspace, "system-deploy-cspaceoperator-openshift.yaml"),
    SystemPriorityClassAdmin => ("system-priorityclass-admin", SystemCspace, "system-priorityclass-admin.yaml"),
    SystemPriorityClassClusterServices => ("system-priorityclass-clusterservices", SystemCspace, "system-priorityclass-clusterservices.yaml"),
    SystemPriorityClassCompute => ("system-priorityclass-compute", SystemCspace, "system-priorityclass-compute.yaml"),
    SystemPriorityClassCritical => ("system-priorityclass-critical", SystemCspace, "system-priorityclass-critical.yaml"),
    SystemPriorityClassGateways => ("system-priorityclass-gateways", SystemCspace, "system-priorityclass-gateways.yaml"),
    SystemPriorityClassMetrics => ("system-priorityclass-metrics", SystemCspace, "system-priorityclass-metrics.yaml"),
    SystemPriorityClassMfs => ("system-priorityclass-mfs", SystemCspace, "system-priorityclass-mfs.yaml"),
    SystemPriorityClassCspaceServices => ("system-priorityclass-cspaceservices", SystemCspace, "system-priorityclass-cspaceservices.yaml"),
    SystemStorageClassHdd => ("system-storageclass-hdd", SystemCspace, "system-storageclass-hdd.yaml"),
    SystemStorageClassNvme => ("system-storageclass-nvme", SystemCspace, "system-storageclass-nvme.yaml"),
    SystemStorageClassSsd => ("system-storageclass-ssd", SystemCspace, "system-storageclass-ssd.yaml"),

    UiNamespace => ("ui-namespace", Ui, "ui-namespace.yaml"),
    UiImagePullSecret => ("ui-imagepullsecret", Ui, "ui-imagepullsecret.yaml"),
    UiSa => ("ui-sa", Ui, "ui-sa.yaml"),
    UiCr => ("ui-cr", Ui, "ui-cr.yaml"),
    UiRole => ("ui-role", Ui, "ui-role.yaml"),
    UiCrb => ("ui-crb", Ui, "ui-crb.yaml"),
    UiRb => ("ui-rb", Ui, "ui-rb.yaml"),
    UiScc => ("ui-scc", Ui, "ui-scc.yaml"),
    UiPas => ("ui-pas", Ui, "ui-deploy-pas.yaml"),
    UiPasSvc => ("ui-pas-svc", Ui, "ui-svc-pas.yaml"),
}

impl Serialize for ManifestKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl std::fmt::Display for ManifestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
