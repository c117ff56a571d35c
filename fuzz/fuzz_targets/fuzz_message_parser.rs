#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use easy_snmp::ber::Decoder;
use easy_snmp::message::Message;
use easy_snmp::oid::Oid;
use easy_snmp::pdu::Pdu;
use easy_snmp::v3::UsmSecurityParams;

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    // whatever arrives on the session socket
    let _ = Message::decode(bytes.clone());

    let mut decoder = Decoder::new(bytes.clone());
    let _ = Pdu::decode(&mut decoder);

    let _ = UsmSecurityParams::decode(bytes);
    let _ = Oid::from_ber(data);
});
