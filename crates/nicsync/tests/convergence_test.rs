mod common;

use common::InMemoryCloud;
use nicsync::{
    BaseNic, DesiredNics, NetworkOp, NicApplier, NicTarget, NicTransport, PacketFilterId,
    SwitchId, reconcile,
};

const SRV: &str = "113300000001";

/// reconcile と apply を 1 サイクル回し、収束後の状態を返す
async fn converge(cloud: &InMemoryCloud, desired: &DesiredNics) -> nicsync::ObservedServer {
    let observed = cloud.read_server(SRV).await.unwrap();
    let plan = reconcile(desired, &observed).unwrap();
    let report = NicApplier::new(cloud).apply(SRV, &plan).await.unwrap();
    assert!(report.is_success(), "apply failed: {:?}", report.results);

    let converged = cloud.read_server(SRV).await.unwrap();
    // 収束後の再計画は空になる
    let again = reconcile(desired, &converged).unwrap();
    assert!(again.is_empty(), "not converged: {:?}", again.ops);
    converged
}

/// 共有セグメントのみのサーバーが 1 NIC / 1 MAC に収束することを確認
#[tokio::test]
async fn test_basic_shared_server() {
    let cloud = InMemoryCloud::new();
    let state = converge(&cloud, &DesiredNics::shared()).await;

    assert_eq!(state.len(), 1);
    assert_eq!(state.mac_addresses().len(), 1);
    assert!(state.slot(0).unwrap().switch.unwrap().is_shared());
}

/// additional NIC を 1 本から 3 本に増やすと MAC が 4 つになることを確認
#[tokio::test]
async fn test_grow_additional_nics() {
    let cloud = InMemoryCloud::new();

    let one = DesiredNics::shared().with_additional(vec![NicTarget::Disconnected]);
    let state = converge(&cloud, &one).await;
    assert_eq!(state.mac_addresses().len(), 2);
    let base_mac = state.slot(0).unwrap().mac_address.clone();

    let three = DesiredNics::shared().with_additional(vec![
        NicTarget::Disconnected,
        NicTarget::Switch(SwitchId(42)),
        NicTarget::Switch(SwitchId(43)),
    ]);
    let observed = cloud.read_server(SRV).await.unwrap();
    let plan = reconcile(&three, &observed).unwrap();
    let summary = plan.summary();
    assert_eq!(summary.add, 2);
    assert_eq!(summary.connect, 2);
    assert!(!plan.ops.iter().any(|op| matches!(
        op,
        NetworkOp::ConnectShared | NetworkOp::DisconnectShared
    )));

    let report = NicApplier::new(&cloud).apply(SRV, &plan).await.unwrap();
    assert!(report.is_success());

    let state = cloud.read_server(SRV).await.unwrap();
    assert_eq!(state.mac_addresses().len(), 4);
    // スロット 0 は手つかずのまま
    assert_eq!(state.slot(0).unwrap().mac_address, base_mac);
    assert!(state.slot(0).unwrap().switch.unwrap().is_shared());
}

/// nic を空にしても NIC 自体は残り、MAC 数が変わらないことを確認
#[tokio::test]
async fn test_unplug_everything() {
    let cloud = InMemoryCloud::new();
    converge(
        &cloud,
        &DesiredNics::shared().with_additional(vec![NicTarget::Disconnected]),
    )
    .await;

    let nothing = DesiredNics::disconnected().with_additional(vec![NicTarget::Disconnected]);
    let state = converge(&cloud, &nothing).await;

    assert_eq!(state.mac_addresses().len(), 2);
    assert!(state.slot(0).unwrap().switch.is_none());
    assert!(state.slot(1).unwrap().switch.is_none());
}

/// 接続済みスイッチを slot 0 に移す際、同一スイッチなら繋ぎ直さないことを確認
#[tokio::test]
async fn test_connect_same_switch() {
    let cloud = InMemoryCloud::new();
    let sw = SwitchId(42);

    let before = DesiredNics::shared().with_additional(vec![NicTarget::Switch(sw)]);
    let state = converge(&cloud, &before).await;
    assert_eq!(state.slot(1).unwrap().switch.unwrap().id, sw);
    let macs_before: Vec<String> = state
        .mac_addresses()
        .iter()
        .map(|m| m.as_str().to_string())
        .collect();

    let after = DesiredNics::shared()
        .with_base(BaseNic::Switch(sw))
        .with_additional(vec![NicTarget::Disconnected]);
    let observed = cloud.read_server(SRV).await.unwrap();
    let plan = reconcile(&after, &observed).unwrap();

    // slot 1 への connect は出ない
    assert!(
        !plan
            .ops
            .iter()
            .any(|op| matches!(op, NetworkOp::Connect { slot: 1, .. }))
    );
    // NIC の作り直しも起きない
    assert!(!plan.ops.iter().any(|op| matches!(
        op,
        NetworkOp::AddInterface | NetworkOp::RemoveInterface { .. }
    )));

    let state = converge(&cloud, &after).await;
    assert_eq!(state.slot(0).unwrap().switch.unwrap().id, sw);
    assert!(!state.slot(0).unwrap().switch.unwrap().is_shared());

    // MAC は両スロットとも維持される
    let macs_after: Vec<String> = state
        .mac_addresses()
        .iter()
        .map(|m| m.as_str().to_string())
        .collect();
    assert_eq!(macs_before, macs_after);
}

/// packet filter の付け替え・削除のライフサイクルを確認
#[tokio::test]
async fn test_packet_filter_lifecycle() {
    let cloud = InMemoryCloud::new();
    let f1 = PacketFilterId(101);
    let f2 = PacketFilterId(102);

    // ["", f2]
    let step1 = DesiredNics::shared()
        .with_additional(vec![NicTarget::Disconnected])
        .with_packet_filters(vec![None, Some(f2)]);
    let state = converge(&cloud, &step1).await;
    assert_eq!(state.slot(0).unwrap().packet_filter, None);
    assert_eq!(state.slot(1).unwrap().packet_filter, Some(f2));

    // [f1, f2]
    let step2 = DesiredNics::shared()
        .with_additional(vec![NicTarget::Disconnected])
        .with_packet_filters(vec![Some(f1), Some(f2)]);
    let state = converge(&cloud, &step2).await;
    assert_eq!(state.slot(0).unwrap().packet_filter, Some(f1));
    assert_eq!(state.slot(1).unwrap().packet_filter, Some(f2));

    // [f1]
    let step3 = DesiredNics::shared()
        .with_additional(vec![NicTarget::Disconnected])
        .with_packet_filters(vec![Some(f1)]);
    let state = converge(&cloud, &step3).await;
    assert_eq!(state.slot(0).unwrap().packet_filter, Some(f1));
    assert_eq!(state.slot(1).unwrap().packet_filter, None);

    // フィルタ指定なし
    let step4 = DesiredNics::shared().with_additional(vec![NicTarget::Disconnected]);
    let state = converge(&cloud, &step4).await;
    assert_eq!(state.slot(0).unwrap().packet_filter, None);
    assert_eq!(state.slot(1).unwrap().packet_filter, None);
}

/// NIC を減らした場合、余剰スロットが切断されてから削除されることを確認
#[tokio::test]
async fn test_shrink_additional_nics() {
    let cloud = InMemoryCloud::new();
    converge(
        &cloud,
        &DesiredNics::shared().with_additional(vec![
            NicTarget::Switch(SwitchId(42)),
            NicTarget::Switch(SwitchId(43)),
            NicTarget::Switch(SwitchId(44)),
        ]),
    )
    .await;

    let state = converge(&cloud, &DesiredNics::shared()).await;
    assert_eq!(state.len(), 1);
    assert!(state.slot(0).unwrap().switch.unwrap().is_shared());
}
