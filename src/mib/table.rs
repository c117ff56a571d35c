//! Built-in MIB definitions.
//!
//! A compact subset of the modules every net-snmp installation ships:
//! the SNMPv2-SMI skeleton, SNMPv2-MIB, IF-MIB, IP-MIB, HOST-RESOURCES-MIB,
//! DISMAN-EVENT-MIB and the NET-SNMP roots.

use super::{MibEntry, Syntax};

const fn node(module: &'static str, name: &'static str, oid: &'static [u32]) -> MibEntry {
    MibEntry {
        module,
        name,
        oid,
        syntax: Syntax::None,
        enums: &[],
    }
}

const fn leaf(
    module: &'static str,
    name: &'static str,
    oid: &'static [u32],
    syntax: Syntax,
) -> MibEntry {
    MibEntry {
        module,
        name,
        oid,
        syntax,
        enums: &[],
    }
}

const fn enumerated(
    module: &'static str,
    name: &'static str,
    oid: &'static [u32],
    enums: &'static [(i32, &'static str)],
) -> MibEntry {
    MibEntry {
        module,
        name,
        oid,
        syntax: Syntax::Integer,
        enums,
    }
}

const SMI: &str = "SNMPv2-SMI";
const V2: &str = "SNMPv2-MIB";
const IF: &str = "IF-MIB";
const IP: &str = "IP-MIB";
const HR: &str = "HOST-RESOURCES-MIB";
const NS: &str = "NET-SNMP-MIB";
const NSA: &str = "NET-SNMP-AGENT-MIB";
const RFC1213: &str = "RFC1213-MIB";

const TRUTH: &[(i32, &str)] = &[(1, "true"), (2, "false")];
const ENABLED: &[(i32, &str)] = &[(1, "enabled"), (2, "disabled")];
const IF_ADMIN: &[(i32, &str)] = &[(1, "up"), (2, "down"), (3, "testing")];
const IF_OPER: &[(i32, &str)] = &[
    (1, "up"),
    (2, "down"),
    (3, "testing"),
    (4, "unknown"),
    (5, "dormant"),
    (6, "notPresent"),
    (7, "lowerLayerDown"),
];
const IF_TYPE: &[(i32, &str)] = &[
    (1, "other"),
    (6, "ethernetCsmacd"),
    (23, "ppp"),
    (24, "softwareLoopback"),
    (53, "propVirtual"),
    (131, "tunnel"),
    (135, "l2vlan"),
    (136, "l3ipvlan"),
    (161, "ieee8023adLag"),
];
const IP_FORWARDING: &[(i32, &str)] = &[(1, "forwarding"), (2, "notForwarding")];
const HR_DEVICE_STATUS: &[(i32, &str)] = &[
    (1, "unknown"),
    (2, "running"),
    (3, "warning"),
    (4, "testing"),
    (5, "down"),
];
const HR_RUN_STATUS: &[(i32, &str)] = &[
    (1, "running"),
    (2, "runnable"),
    (3, "notRunnable"),
    (4, "invalid"),
];
const HR_RUN_TYPE: &[(i32, &str)] = &[
    (1, "unknown"),
    (2, "operatingSystem"),
    (3, "deviceDriver"),
    (4, "application"),
];
const NS_CACHE_STATUS: &[(i32, &str)] = &[
    (1, "enabled"),
    (2, "disabled"),
    (3, "empty"),
    (4, "cached"),
    (5, "expired"),
];

/// Every built-in definition. Order is irrelevant; the MIB indexes it.
pub(super) static ENTRIES: &[MibEntry] = &[
    // SNMPv2-SMI
    node(SMI, "iso", &[1]),
    node(SMI, "org", &[1, 3]),
    node(SMI, "dod", &[1, 3, 6]),
    node(SMI, "internet", &[1, 3, 6, 1]),
    node(SMI, "directory", &[1, 3, 6, 1, 1]),
    node(SMI, "mgmt", &[1, 3, 6, 1, 2]),
    node(SMI, "mib-2", &[1, 3, 6, 1, 2, 1]),
    node(SMI, "transmission", &[1, 3, 6, 1, 2, 1, 10]),
    node(SMI, "experimental", &[1, 3, 6, 1, 3]),
    node(SMI, "private", &[1, 3, 6, 1, 4]),
    node(SMI, "enterprises", &[1, 3, 6, 1, 4, 1]),
    node(SMI, "security", &[1, 3, 6, 1, 5]),
    node(SMI, "snmpV2", &[1, 3, 6, 1, 6]),
    node(SMI, "snmpDomains", &[1, 3, 6, 1, 6, 1]),
    node(SMI, "snmpProxys", &[1, 3, 6, 1, 6, 2]),
    node(SMI, "snmpModules", &[1, 3, 6, 1, 6, 3]),
    // SNMPv2-MIB: system
    node(V2, "system", &[1, 3, 6, 1, 2, 1, 1]),
    leaf(V2, "sysDescr", &[1, 3, 6, 1, 2, 1, 1, 1], Syntax::DisplayString),
    leaf(V2, "sysObjectID", &[1, 3, 6, 1, 2, 1, 1, 2], Syntax::ObjectIdentifier),
    leaf(V2, "sysUpTime", &[1, 3, 6, 1, 2, 1, 1, 3], Syntax::TimeTicks),
    leaf(V2, "sysContact", &[1, 3, 6, 1, 2, 1, 1, 4], Syntax::DisplayString),
    leaf(V2, "sysName", &[1, 3, 6, 1, 2, 1, 1, 5], Syntax::DisplayString),
    leaf(V2, "sysLocation", &[1, 3, 6, 1, 2, 1, 1, 6], Syntax::DisplayString),
    leaf(V2, "sysServices", &[1, 3, 6, 1, 2, 1, 1, 7], Syntax::Integer),
    leaf(V2, "sysORLastChange", &[1, 3, 6, 1, 2, 1, 1, 8], Syntax::TimeTicks),
    node(V2, "sysORTable", &[1, 3, 6, 1, 2, 1, 1, 9]),
    node(V2, "sysOREntry", &[1, 3, 6, 1, 2, 1, 1, 9, 1]),
    leaf(V2, "sysORIndex", &[1, 3, 6, 1, 2, 1, 1, 9, 1, 1], Syntax::Integer),
    leaf(V2, "sysORID", &[1, 3, 6, 1, 2, 1, 1, 9, 1, 2], Syntax::ObjectIdentifier),
    leaf(V2, "sysORDescr", &[1, 3, 6, 1, 2, 1, 1, 9, 1, 3], Syntax::DisplayString),
    leaf(V2, "sysORUpTime", &[1, 3, 6, 1, 2, 1, 1, 9, 1, 4], Syntax::TimeTicks),
    leaf(
        "DISMAN-EVENT-MIB",
        "sysUpTimeInstance",
        &[1, 3, 6, 1, 2, 1, 1, 3, 0],
        Syntax::TimeTicks,
    ),
    // IF-MIB
    node(IF, "interfaces", &[1, 3, 6, 1, 2, 1, 2]),
    leaf(IF, "ifNumber", &[1, 3, 6, 1, 2, 1, 2, 1], Syntax::Integer),
    node(IF, "ifTable", &[1, 3, 6, 1, 2, 1, 2, 2]),
    node(IF, "ifEntry", &[1, 3, 6, 1, 2, 1, 2, 2, 1]),
    leaf(IF, "ifIndex", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 1], Syntax::Integer),
    leaf(IF, "ifDescr", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 2], Syntax::DisplayString),
    enumerated(IF, "ifType", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 3], IF_TYPE),
    leaf(IF, "ifMtu", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 4], Syntax::Integer),
    leaf(IF, "ifSpeed", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 5], Syntax::Gauge32),
    leaf(IF, "ifPhysAddress", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 6], Syntax::PhysAddress),
    enumerated(IF, "ifAdminStatus", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 7], IF_ADMIN),
    enumerated(IF, "ifOperStatus", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 8], IF_OPER),
    leaf(IF, "ifLastChange", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 9], Syntax::TimeTicks),
    leaf(IF, "ifInOctets", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 10], Syntax::Counter32),
    leaf(IF, "ifInUcastPkts", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 11], Syntax::Counter32),
    leaf(IF, "ifInNUcastPkts", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 12], Syntax::Counter32),
    leaf(IF, "ifInDiscards", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 13], Syntax::Counter32),
    leaf(IF, "ifInErrors", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 14], Syntax::Counter32),
    leaf(IF, "ifInUnknownProtos", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 15], Syntax::Counter32),
    leaf(IF, "ifOutOctets", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 16], Syntax::Counter32),
    leaf(IF, "ifOutUcastPkts", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 17], Syntax::Counter32),
    leaf(IF, "ifOutNUcastPkts", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 18], Syntax::Counter32),
    leaf(IF, "ifOutDiscards", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 19], Syntax::Counter32),
    leaf(IF, "ifOutErrors", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 20], Syntax::Counter32),
    leaf(IF, "ifOutQLen", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 21], Syntax::Gauge32),
    leaf(IF, "ifSpecific", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 22], Syntax::ObjectIdentifier),
    node(IF, "ifMIB", &[1, 3, 6, 1, 2, 1, 31]),
    node(IF, "ifMIBObjects", &[1, 3, 6, 1, 2, 1, 31, 1]),
    node(IF, "ifXTable", &[1, 3, 6, 1, 2, 1, 31, 1, 1]),
    node(IF, "ifXEntry", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1]),
    leaf(IF, "ifName", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 1], Syntax::DisplayString),
    leaf(IF, "ifInMulticastPkts", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 2], Syntax::Counter32),
    leaf(IF, "ifInBroadcastPkts", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 3], Syntax::Counter32),
    leaf(IF, "ifOutMulticastPkts", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 4], Syntax::Counter32),
    leaf(IF, "ifOutBroadcastPkts", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 5], Syntax::Counter32),
    leaf(IF, "ifHCInOctets", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 6], Syntax::Counter64),
    leaf(IF, "ifHCInUcastPkts", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 7], Syntax::Counter64),
    leaf(IF, "ifHCOutOctets", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 10], Syntax::Counter64),
    leaf(IF, "ifHCOutUcastPkts", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 11], Syntax::Counter64),
    enumerated(IF, "ifLinkUpDownTrapEnable", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 14], ENABLED),
    leaf(IF, "ifHighSpeed", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 15], Syntax::Gauge32),
    enumerated(IF, "ifPromiscuousMode", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 16], TRUTH),
    enumerated(IF, "ifConnectorPresent", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 17], TRUTH),
    leaf(IF, "ifAlias", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 18], Syntax::DisplayString),
    leaf(IF, "ifCounterDiscontinuityTime", &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 19], Syntax::TimeTicks),
    // IP-MIB
    node(IP, "ip", &[1, 3, 6, 1, 2, 1, 4]),
    enumerated(IP, "ipForwarding", &[1, 3, 6, 1, 2, 1, 4, 1], IP_FORWARDING),
    leaf(IP, "ipDefaultTTL", &[1, 3, 6, 1, 2, 1, 4, 2], Syntax::Integer),
    leaf(IP, "ipInReceives", &[1, 3, 6, 1, 2, 1, 4, 3], Syntax::Counter32),
    leaf(IP, "ipInHdrErrors", &[1, 3, 6, 1, 2, 1, 4, 4], Syntax::Counter32),
    leaf(IP, "ipInAddrErrors", &[1, 3, 6, 1, 2, 1, 4, 5], Syntax::Counter32),
    leaf(IP, "ipForwDatagrams", &[1, 3, 6, 1, 2, 1, 4, 6], Syntax::Counter32),
    leaf(IP, "ipInDelivers", &[1, 3, 6, 1, 2, 1, 4, 9], Syntax::Counter32),
    leaf(IP, "ipOutRequests", &[1, 3, 6, 1, 2, 1, 4, 10], Syntax::Counter32),
    node(IP, "ipAddrTable", &[1, 3, 6, 1, 2, 1, 4, 20]),
    node(IP, "ipAddrEntry", &[1, 3, 6, 1, 2, 1, 4, 20, 1]),
    leaf(IP, "ipAdEntAddr", &[1, 3, 6, 1, 2, 1, 4, 20, 1, 1], Syntax::IpAddress),
    leaf(IP, "ipAdEntIfIndex", &[1, 3, 6, 1, 2, 1, 4, 20, 1, 2], Syntax::Integer),
    leaf(IP, "ipAdEntNetMask", &[1, 3, 6, 1, 2, 1, 4, 20, 1, 3], Syntax::IpAddress),
    leaf(IP, "ipAdEntBcastAddr", &[1, 3, 6, 1, 2, 1, 4, 20, 1, 4], Syntax::Integer),
    node(RFC1213, "ipRouteTable", &[1, 3, 6, 1, 2, 1, 4, 21]),
    node(RFC1213, "ipRouteEntry", &[1, 3, 6, 1, 2, 1, 4, 21, 1]),
    leaf(RFC1213, "ipRouteDest", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 1], Syntax::IpAddress),
    leaf(RFC1213, "ipRouteIfIndex", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 2], Syntax::Integer),
    leaf(RFC1213, "ipRouteNextHop", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 7], Syntax::IpAddress),
    leaf(RFC1213, "ipRouteMask", &[1, 3, 6, 1, 2, 1, 4, 21, 1, 11], Syntax::IpAddress),
    node(IP, "ipForward", &[1, 3, 6, 1, 2, 1, 4, 24]),
    // SNMPv2-MIB: snmp group
    node(V2, "snmp", &[1, 3, 6, 1, 2, 1, 11]),
    leaf(V2, "snmpInPkts", &[1, 3, 6, 1, 2, 1, 11, 1], Syntax::Counter32),
    leaf(V2, "snmpOutPkts", &[1, 3, 6, 1, 2, 1, 11, 2], Syntax::Counter32),
    leaf(V2, "snmpInBadVersions", &[1, 3, 6, 1, 2, 1, 11, 3], Syntax::Counter32),
    leaf(V2, "snmpInBadCommunityNames", &[1, 3, 6, 1, 2, 1, 11, 4], Syntax::Counter32),
    leaf(V2, "snmpInGetRequests", &[1, 3, 6, 1, 2, 1, 11, 15], Syntax::Counter32),
    leaf(V2, "snmpInGetNexts", &[1, 3, 6, 1, 2, 1, 11, 16], Syntax::Counter32),
    leaf(V2, "snmpInSetRequests", &[1, 3, 6, 1, 2, 1, 11, 17], Syntax::Counter32),
    leaf(V2, "snmpOutGetResponses", &[1, 3, 6, 1, 2, 1, 11, 28], Syntax::Counter32),
    enumerated(V2, "snmpEnableAuthenTraps", &[1, 3, 6, 1, 2, 1, 11, 30], ENABLED),
    // HOST-RESOURCES-MIB
    node(HR, "host", &[1, 3, 6, 1, 2, 1, 25]),
    node(HR, "hrSystem", &[1, 3, 6, 1, 2, 1, 25, 1]),
    leaf(HR, "hrSystemUptime", &[1, 3, 6, 1, 2, 1, 25, 1, 1], Syntax::TimeTicks),
    leaf(HR, "hrSystemDate", &[1, 3, 6, 1, 2, 1, 25, 1, 2], Syntax::OctetString),
    leaf(HR, "hrSystemNumUsers", &[1, 3, 6, 1, 2, 1, 25, 1, 5], Syntax::Gauge32),
    leaf(HR, "hrSystemProcesses", &[1, 3, 6, 1, 2, 1, 25, 1, 6], Syntax::Gauge32),
    leaf(HR, "hrSystemMaxProcesses", &[1, 3, 6, 1, 2, 1, 25, 1, 7], Syntax::Integer),
    node(HR, "hrStorage", &[1, 3, 6, 1, 2, 1, 25, 2]),
    leaf(HR, "hrMemorySize", &[1, 3, 6, 1, 2, 1, 25, 2, 2], Syntax::Integer),
    node(HR, "hrStorageTable", &[1, 3, 6, 1, 2, 1, 25, 2, 3]),
    node(HR, "hrStorageEntry", &[1, 3, 6, 1, 2, 1, 25, 2, 3, 1]),
    leaf(HR, "hrStorageIndex", &[1, 3, 6, 1, 2, 1, 25, 2, 3, 1, 1], Syntax::Integer),
    leaf(HR, "hrStorageType", &[1, 3, 6, 1, 2, 1, 25, 2, 3, 1, 2], Syntax::ObjectIdentifier),
    leaf(HR, "hrStorageDescr", &[1, 3, 6, 1, 2, 1, 25, 2, 3, 1, 3], Syntax::DisplayString),
    leaf(HR, "hrStorageAllocationUnits", &[1, 3, 6, 1, 2, 1, 25, 2, 3, 1, 4], Syntax::Integer),
    leaf(HR, "hrStorageSize", &[1, 3, 6, 1, 2, 1, 25, 2, 3, 1, 5], Syntax::Integer),
    leaf(HR, "hrStorageUsed", &[1, 3, 6, 1, 2, 1, 25, 2, 3, 1, 6], Syntax::Integer),
    node(HR, "hrDevice", &[1, 3, 6, 1, 2, 1, 25, 3]),
    node(HR, "hrDeviceTable", &[1, 3, 6, 1, 2, 1, 25, 3, 2]),
    node(HR, "hrDeviceEntry", &[1, 3, 6, 1, 2, 1, 25, 3, 2, 1]),
    leaf(HR, "hrDeviceIndex", &[1, 3, 6, 1, 2, 1, 25, 3, 2, 1, 1], Syntax::Integer),
    leaf(HR, "hrDeviceDescr", &[1, 3, 6, 1, 2, 1, 25, 3, 2, 1, 3], Syntax::DisplayString),
    enumerated(HR, "hrDeviceStatus", &[1, 3, 6, 1, 2, 1, 25, 3, 2, 1, 5], HR_DEVICE_STATUS),
    node(HR, "hrSWRun", &[1, 3, 6, 1, 2, 1, 25, 4]),
    node(HR, "hrSWRunTable", &[1, 3, 6, 1, 2, 1, 25, 4, 2]),
    node(HR, "hrSWRunEntry", &[1, 3, 6, 1, 2, 1, 25, 4, 2, 1]),
    leaf(HR, "hrSWRunIndex", &[1, 3, 6, 1, 2, 1, 25, 4, 2, 1, 1], Syntax::Integer),
    leaf(HR, "hrSWRunName", &[1, 3, 6, 1, 2, 1, 25, 4, 2, 1, 2], Syntax::DisplayString),
    leaf(HR, "hrSWRunPath", &[1, 3, 6, 1, 2, 1, 25, 4, 2, 1, 4], Syntax::DisplayString),
    enumerated(HR, "hrSWRunType", &[1, 3, 6, 1, 2, 1, 25, 4, 2, 1, 6], HR_RUN_TYPE),
    enumerated(HR, "hrSWRunStatus", &[1, 3, 6, 1, 2, 1, 25, 4, 2, 1, 7], HR_RUN_STATUS),
    // NET-SNMP
    node(NS, "netSnmp", &[1, 3, 6, 1, 4, 1, 8072]),
    node(NS, "netSnmpObjects", &[1, 3, 6, 1, 4, 1, 8072, 1]),
    node(NS, "netSnmpEnumerations", &[1, 3, 6, 1, 4, 1, 8072, 3]),
    node(NS, "netSnmpAgentOIDs", &[1, 3, 6, 1, 4, 1, 8072, 3, 2]),
    node(NS, "linux", &[1, 3, 6, 1, 4, 1, 8072, 3, 2, 10]),
    node(NSA, "nsCache", &[1, 3, 6, 1, 4, 1, 8072, 1, 5]),
    leaf(NSA, "nsCacheDefaultTimeout", &[1, 3, 6, 1, 4, 1, 8072, 1, 5, 1], Syntax::Integer),
    enumerated(NSA, "nsCacheEnabled", &[1, 3, 6, 1, 4, 1, 8072, 1, 5, 2], TRUTH),
    node(NSA, "nsCacheTable", &[1, 3, 6, 1, 4, 1, 8072, 1, 5, 3]),
    node(NSA, "nsCacheEntry", &[1, 3, 6, 1, 4, 1, 8072, 1, 5, 3, 1]),
    leaf(NSA, "nsCachedOID", &[1, 3, 6, 1, 4, 1, 8072, 1, 5, 3, 1, 1], Syntax::ObjectIdentifier),
    leaf(NSA, "nsCacheTimeout", &[1, 3, 6, 1, 4, 1, 8072, 1, 5, 3, 1, 2], Syntax::Integer),
    enumerated(NSA, "nsCacheStatus", &[1, 3, 6, 1, 4, 1, 8072, 1, 5, 3, 1, 3], NS_CACHE_STATUS),
    // SNMP-FRAMEWORK / USM statistics, seen in reports
    node("SNMP-USER-BASED-SM-MIB", "usmStats", &[1, 3, 6, 1, 6, 3, 15, 1, 1]),
    leaf("SNMP-USER-BASED-SM-MIB", "usmStatsUnsupportedSecLevels", &[1, 3, 6, 1, 6, 3, 15, 1, 1, 1], Syntax::Counter32),
    leaf("SNMP-USER-BASED-SM-MIB", "usmStatsNotInTimeWindows", &[1, 3, 6, 1, 6, 3, 15, 1, 1, 2], Syntax::Counter32),
    leaf("SNMP-USER-BASED-SM-MIB", "usmStatsUnknownUserNames", &[1, 3, 6, 1, 6, 3, 15, 1, 1, 3], Syntax::Counter32),
    leaf("SNMP-USER-BASED-SM-MIB", "usmStatsUnknownEngineIDs", &[1, 3, 6, 1, 6, 3, 15, 1, 1, 4], Syntax::Counter32),
    leaf("SNMP-USER-BASED-SM-MIB", "usmStatsWrongDigests", &[1, 3, 6, 1, 6, 3, 15, 1, 1, 5], Syntax::Counter32),
    leaf("SNMP-USER-BASED-SM-MIB", "usmStatsDecryptionErrors", &[1, 3, 6, 1, 6, 3, 15, 1, 1, 6], Syntax::Counter32),
];
