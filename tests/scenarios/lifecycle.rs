//! Start/stop/restart/logs/attach scenarios against the services fixture.

#![allow(clippy::expect_used)]

use shellmock::{CommandRunner as _, MockDispatcher, MockError, Response};

use crate::helpers::{NAMESPACE, SERVICE, services_fixture};

#[test]
fn start_returns_the_scaled_message_then_exhausts() {
    let mock = MockDispatcher::new(services_fixture());
    let command = format!("kubectl scale -n {NAMESPACE} statefulset/{SERVICE} --replicas=1");

    let response = mock.intercept("start", &command).expect("exact command");
    assert_eq!(
        response,
        Response::Text(format!("statefulset.apps/{SERVICE} scaled"))
    );

    let err = mock.intercept("start", &command).expect_err("only one rule");
    assert!(matches!(
        err,
        MockError::SequenceExhausted { consumed: 1, .. }
    ));
}

#[test]
fn stop_and_start_have_independent_cursors() {
    let mock = MockDispatcher::new(services_fixture());
    mock.intercept(
        "stop",
        &format!("kubectl scale -n {NAMESPACE} statefulset/{SERVICE} --replicas=0"),
    )
    .expect("stop rule");
    mock.intercept(
        "start",
        &format!("kubectl scale -n {NAMESPACE} statefulset/{SERVICE} --replicas=1"),
    )
    .expect("start rule is untouched by the stop call");
}

#[tokio::test]
async fn restart_consumes_lookup_then_delete_in_order() {
    let mock = MockDispatcher::new(services_fixture());
    let runner = mock.runner("restart");

    // The tool first resolves the pod name, then deletes exactly that pod.
    let pod = runner
        .run(&format!(
            "kubectl get -n {NAMESPACE} pod -l app={SERVICE} -o name"
        ))
        .await
        .expect("lookup rule");
    assert_eq!(pod, format!("pod/{SERVICE}-0"));

    runner
        .run(&format!("kubectl delete -n {NAMESPACE} {pod}"))
        .await
        .expect("delete rule");

    assert_eq!(mock.consumed("restart"), 2);
    assert_eq!(
        mock.calls("restart"),
        vec![
            format!("kubectl get -n {NAMESPACE} pod -l app={SERVICE} -o name"),
            format!("kubectl delete -n {NAMESPACE} pod/{SERVICE}-0"),
        ]
    );
}

#[tokio::test]
async fn restart_out_of_order_is_an_unexpected_command() {
    let mock = MockDispatcher::new(services_fixture());
    let runner = mock.runner("restart");

    // Deleting before looking the pod up hits rule 0, which expects the
    // lookup: no reordering, no searching.
    let err = runner
        .run(&format!("kubectl delete -n {NAMESPACE} pod/{SERVICE}-0"))
        .await
        .expect_err("rule 0 is the lookup");
    let mock_err = err.downcast::<MockError>().expect("typed mock error");
    assert!(matches!(
        mock_err,
        MockError::UnexpectedCommand { index: 0, .. }
    ));
}

#[tokio::test]
async fn attach_is_an_interactive_success_with_no_output() {
    let mock = MockDispatcher::new(services_fixture());
    let ok = mock
        .runner("attach")
        .run_interactive(&format!(
            "kubectl -it -n {NAMESPACE} attach statefulset/{SERVICE}"
        ))
        .await
        .expect("rsp true");
    assert!(ok);
}

#[tokio::test]
async fn logs_returns_the_multiline_block() {
    let mock = MockDispatcher::new(services_fixture());
    let output = mock
        .runner("logs")
        .run(&format!("kubectl -n {NAMESPACE} logs statefulset/{SERVICE}"))
        .await
        .expect("logs rule");
    assert_eq!(output, "Starting iocInit\niocRun: All initialization complete\n");
}

#[tokio::test]
async fn log_history_opens_the_search_url() {
    // Browser-style calls are just commands to the mock: a URL with
    // query metacharacters escaped in the pattern, a flag response.
    let mock = MockDispatcher::new(services_fixture());
    let ok = mock
        .runner("log_history")
        .run_interactive(
            "xdg-open https://graylog.diamond.ac.uk/search?q=pod_name%3Abl01t-ea-test-01&rangetype=relative",
        )
        .await
        .expect("url matches the pattern");
    assert!(ok);
}

#[test]
fn checks_sequence_runs_namespace_then_service() {
    let mock = MockDispatcher::new(services_fixture());
    mock.intercept("checks", &format!("kubectl get namespace {NAMESPACE} -o name"))
        .expect("namespace check");
    mock.intercept(
        "checks",
        &format!("kubectl get statefulset -o name -n {NAMESPACE} {SERVICE} --ignore-not-found"),
    )
    .expect("service check");
    mock.intercept("checks", "kubectl get deployment").expect_err("two rules only");
}
