//! Integration tests for the role-based authorization policy

use badge_access_control::entities::{DepartmentUpdate, UserUpdate};
use badge_access_control::*;
use std::time::Duration;

const ALL_KINDS: [EntityKind; 4] = [EntityKind::User, EntityKind::Department, EntityKind::Sensor, EntityKind::Barrier];

fn seeded_service() -> (AccessControlService, Caller, Caller) {
    let service = AccessControlService::in_memory(Duration::from_millis(250));
    seed_demo_data(service.store()).unwrap();
    let admin = Caller::from(service.actor_for_username("admin").unwrap());
    let operator = Caller::from(service.actor_for_username("operator").unwrap());
    (service, admin, operator)
}

/// Full policy table for both roles
#[test]
fn test_policy_matrix() {
    for kind in ALL_KINDS {
        assert!(authorize(Some(Role::Operator), Operation::Read(kind)).is_allowed());
        assert!(authorize(Some(Role::Admin), Operation::Read(kind)).is_allowed());

        for operation in [Operation::Create(kind), Operation::Update(kind), Operation::Delete(kind)] {
            assert_eq!(operation.class(), OperationClass::Mutate);
            assert!(authorize(Some(Role::Admin), operation).is_allowed());
            assert!(!authorize(Some(Role::Operator), operation).is_allowed());
        }
    }

    for operation in [Operation::OpenBarrier, Operation::CloseBarrier] {
        assert_eq!(operation.class(), OperationClass::ManualBarrierCommand);
        assert!(authorize(Some(Role::Operator), operation).is_allowed());
        assert!(authorize(Some(Role::Admin), operation).is_allowed());
        assert!(!authorize(None, operation).is_allowed());
    }
}

/// The policy is a pure function of its inputs
#[test]
fn test_policy_is_deterministic() {
    let first = authorize(Some(Role::Operator), Operation::ActivateSensor);
    for _ in 0..10 {
        assert_eq!(authorize(Some(Role::Operator), Operation::ActivateSensor), first);
    }
}

/// Operator department delete is forbidden, changes nothing, and logs no event
#[test]
fn test_operator_department_delete_forbidden() {
    let (service, _, operator) = seeded_service();
    let department = service.store().find_department_by_name("Reception").unwrap();

    let error = service.delete_department(&operator, department.id).unwrap_err();
    assert!(matches!(error, AccessControlError::Forbidden { .. }));
    assert_eq!(error.status_code(), 403);
    assert!(service.store().get_department(department.id).is_ok());
    assert_eq!(service.store().barrier_count(), 2);
    assert!(service.events().is_empty());
}

/// Operators can read everything
#[test]
fn test_operator_reads() {
    let (service, _, operator) = seeded_service();

    assert_eq!(service.list_users(&operator).unwrap().len(), 2);
    assert_eq!(service.list_departments(&operator).unwrap().len(), 3);
    assert_eq!(service.list_sensors(&operator).unwrap().len(), 3);
    assert_eq!(service.list_barriers(&operator).unwrap().len(), 2);
    assert!(service.query_events(&operator, &EventFilter::new()).unwrap().is_empty());
}

/// Every mutation path refuses operators
#[test]
fn test_operator_mutations_refused() {
    let (service, _, operator) = seeded_service();
    let sensor = service.store().find_sensor_by_uid("RFID-001-AAA").unwrap();
    let department = service.store().find_department_by_name("Warehouse").unwrap();
    let user = service.store().find_user_by_username("admin").unwrap();

    let results = [
        service.create_user(&operator, NewUser::new("intruder", Role::Admin)).map(|_| ()),
        service.update_user(&operator, user.id, UserUpdate { role: Some(Role::Operator), ..Default::default() }).map(|_| ()),
        service.deactivate_user(&operator, user.id).map(|_| ()),
        service.create_department(&operator, NewDepartment::new("Garage", "")).map(|_| ()),
        service
            .update_department(&operator, department.id, DepartmentUpdate { active: Some(false), ..Default::default() })
            .map(|_| ()),
        service.create_sensor(&operator, NewSensor::new("RFID-NEW", "New card")).map(|_| ()),
        service.activate_sensor(&operator, sensor.id).map(|_| ()),
        service.deactivate_sensor(&operator, sensor.id).map(|_| ()),
        service.delete_sensor(&operator, sensor.id).map(|_| ()),
        service.create_barrier(&operator, NewBarrier::new("Side Gate", department.id)).map(|_| ()),
    ];

    for result in results {
        assert_eq!(result.unwrap_err().status_code(), 403);
    }
    assert_eq!(service.store().sensor_count(), 3);
    assert!(service.store().find_user_by_username("admin").unwrap().is_admin());
}

/// Anonymous callers are refused everywhere with 401
#[test]
fn test_anonymous_refused() {
    let (service, _, _) = seeded_service();
    let anonymous = Caller::Anonymous;

    assert_eq!(service.list_sensors(&anonymous).unwrap_err().status_code(), 401);
    assert_eq!(service.event_statistics(&anonymous).unwrap_err().status_code(), 401);
    assert_eq!(
        service.create_department(&anonymous, NewDepartment::new("Garage", "")).unwrap_err().status_code(),
        401
    );
}

/// A deactivated user can no longer be resolved as an actor
#[test]
fn test_deactivated_user_cannot_act() {
    let (service, admin, _) = seeded_service();
    let operator = service.store().find_user_by_username("operator").unwrap();

    service.deactivate_user(&admin, operator.id).unwrap();
    assert!(matches!(service.actor_for(operator.id), Err(AccessControlError::Unauthenticated)));
    assert!(service.actor_for_username("operator").is_err());
}

/// Promoting an operator grants mutation rights on the next resolution
#[test]
fn test_role_change_takes_effect_on_next_resolution() {
    let (service, admin, _) = seeded_service();
    let user = service.store().find_user_by_username("operator").unwrap();

    service.update_user(&admin, user.id, UserUpdate { role: Some(Role::Admin), ..Default::default() }).unwrap();
    let promoted = Caller::from(service.actor_for(user.id).unwrap());
    assert!(service.create_department(&promoted, NewDepartment::new("Garage", "Basement")).is_ok());
}
